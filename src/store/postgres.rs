use async_trait::async_trait;
use sqlx::PgPool;

use crate::db;
use crate::models::{EndpointChanges, EndpointRecord, NewEndpoint};

use super::{EndpointStore, StoreError};

pub struct PgEndpointStore {
    pool: PgPool,
}

impl PgEndpointStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error, name: &str) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateKey(name.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl EndpointStore for PgEndpointStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<EndpointRecord>, StoreError> {
        Ok(db::endpoints::find_by_name(&self.pool, name).await?)
    }

    async fn insert(&self, endpoint: NewEndpoint) -> Result<EndpointRecord, StoreError> {
        db::endpoints::create(&self.pool, &endpoint)
            .await
            .map_err(|e| map_unique_violation(e, &endpoint.name))
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<EndpointRecord>, StoreError> {
        Ok(db::endpoints::list(&self.pool, i64::from(skip), i64::from(limit)).await?)
    }

    async fn update(
        &self,
        name: &str,
        changes: EndpointChanges,
    ) -> Result<EndpointRecord, StoreError> {
        let target = changes.name.as_deref().unwrap_or(name);
        db::endpoints::update(&self.pool, name, &changes)
            .await
            .map_err(|e| map_unique_violation(e, target))?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn delete(&self, expected: &EndpointRecord) -> Result<EndpointRecord, StoreError> {
        db::endpoints::delete(&self.pool, expected.id, &expected.name, &expected.password_hash)
            .await?
            .ok_or_else(|| StoreError::NotFound(expected.name.clone()))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
