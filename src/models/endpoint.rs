use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored endpoint row. Never serialized directly: use [`EndpointSummary`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EndpointRecord {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub password_hash: String,
    pub qr_code: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new record. Ids and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewEndpoint {
    pub name: String,
    pub url: String,
    pub password_hash: String,
    pub qr_code: Vec<u8>,
}

/// A partial update. `url` and `qr_code` must be set together.
#[derive(Debug, Clone, Default)]
pub struct EndpointChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub password_hash: Option<String>,
    pub qr_code: Option<Vec<u8>>,
}

/// The public face of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointSummary {
    pub name: String,
    pub url: String,
}

impl From<EndpointRecord> for EndpointSummary {
    fn from(record: EndpointRecord) -> Self {
        EndpointSummary {
            name: record.name,
            url: record.url,
        }
    }
}
