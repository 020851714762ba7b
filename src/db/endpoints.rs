use sqlx::PgPool;

use crate::models::{EndpointChanges, EndpointRecord, NewEndpoint};

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<EndpointRecord>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRecord>("SELECT * FROM endpoints WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, endpoint: &NewEndpoint) -> Result<EndpointRecord, sqlx::Error> {
    sqlx::query_as::<_, EndpointRecord>(
        "INSERT INTO endpoints (name, url, password_hash, qr_code)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&endpoint.name)
    .bind(&endpoint.url)
    .bind(&endpoint.password_hash)
    .bind(&endpoint.qr_code)
    .fetch_one(pool)
    .await
}

/// Insertion order, oldest first.
pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<EndpointRecord>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRecord>(
        "SELECT * FROM endpoints ORDER BY id ASC OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Apply every provided field in one statement. Returns `None` if no row matched.
pub async fn update(
    pool: &PgPool,
    name: &str,
    changes: &EndpointChanges,
) -> Result<Option<EndpointRecord>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRecord>(
        "UPDATE endpoints SET
             name = COALESCE($2, name),
             url = COALESCE($3, url),
             password_hash = COALESCE($4, password_hash),
             qr_code = COALESCE($5, qr_code),
             updated_at = now()
         WHERE name = $1
         RETURNING *",
    )
    .bind(name)
    .bind(changes.name.as_deref())
    .bind(changes.url.as_deref())
    .bind(changes.password_hash.as_deref())
    .bind(changes.qr_code.as_deref())
    .fetch_optional(pool)
    .await
}

/// Deletes the row only while it still matches what the caller verified.
pub async fn delete(
    pool: &PgPool,
    id: i64,
    name: &str,
    password_hash: &str,
) -> Result<Option<EndpointRecord>, sqlx::Error> {
    sqlx::query_as::<_, EndpointRecord>(
        "DELETE FROM endpoints WHERE id = $1 AND name = $2 AND password_hash = $3 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(password_hash)
    .fetch_optional(pool)
    .await
}
