use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{EndpointChanges, EndpointRecord, NewEndpoint};

use super::{EndpointStore, StoreError};

/// Process-local store. Records live in insertion order behind a single mutex,
/// so every operation is atomic.
#[derive(Default)]
pub struct MemoryEndpointStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<EndpointRecord>,
}

impl Inner {
    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }
}

impl MemoryEndpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // No operation can leave `Inner` half-written, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EndpointStore for MemoryEndpointStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<EndpointRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner.position(name).map(|i| inner.records[i].clone()))
    }

    async fn insert(&self, endpoint: NewEndpoint) -> Result<EndpointRecord, StoreError> {
        let mut inner = self.lock();
        if inner.position(&endpoint.name).is_some() {
            return Err(StoreError::DuplicateKey(endpoint.name));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = EndpointRecord {
            id: inner.next_id,
            name: endpoint.name,
            url: endpoint.url,
            password_hash: endpoint.password_hash,
            qr_code: endpoint.qr_code,
            created_at: now,
            updated_at: now,
        };
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<EndpointRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .records
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        name: &str,
        changes: EndpointChanges,
    ) -> Result<EndpointRecord, StoreError> {
        let mut inner = self.lock();
        let idx = inner
            .position(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;

        if let Some(new_name) = changes.name.as_deref() {
            if new_name != name && inner.position(new_name).is_some() {
                return Err(StoreError::DuplicateKey(new_name.to_string()));
            }
        }

        let record = &mut inner.records[idx];
        if let Some(new_name) = changes.name {
            record.name = new_name;
        }
        if let Some(url) = changes.url {
            record.url = url;
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = password_hash;
        }
        if let Some(qr_code) = changes.qr_code {
            record.qr_code = qr_code;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, expected: &EndpointRecord) -> Result<EndpointRecord, StoreError> {
        let mut inner = self.lock();
        let idx = inner
            .records
            .iter()
            .position(|r| {
                r.id == expected.id
                    && r.name == expected.name
                    && r.password_hash == expected.password_hash
            })
            .ok_or_else(|| StoreError::NotFound(expected.name.clone()))?;
        Ok(inner.records.remove(idx))
    }

    async fn close(&self) {
        let mut inner = self.lock();
        tracing::debug!(records = inner.records.len(), "Dropping in-memory endpoints");
        inner.records.clear();
    }
}
