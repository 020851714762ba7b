pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{EndpointChanges, EndpointRecord, NewEndpoint};

pub use memory::MemoryEndpointStore;
pub use postgres::PgEndpointStore;

#[derive(Debug)]
pub enum StoreError {
    /// Another record already uses this name.
    DuplicateKey(String),
    NotFound(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateKey(name) => write!(f, "duplicate endpoint name: {name}"),
            StoreError::NotFound(name) => write!(f, "endpoint not found: {name}"),
            StoreError::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Durable storage of endpoint records, keyed by name.
///
/// Every method is atomic with respect to a single record. Listing follows
/// insertion order.
#[async_trait]
pub trait EndpointStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<EndpointRecord>, StoreError>;

    async fn insert(&self, endpoint: NewEndpoint) -> Result<EndpointRecord, StoreError>;

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<EndpointRecord>, StoreError>;

    async fn update(&self, name: &str, changes: EndpointChanges)
        -> Result<EndpointRecord, StoreError>;

    /// Removes `expected` only if the stored row still has the same id, name
    /// and password hash. Returns the removed row; `NotFound` on any mismatch.
    async fn delete(&self, expected: &EndpointRecord) -> Result<EndpointRecord, StoreError>;

    async fn close(&self);
}
