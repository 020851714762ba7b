use std::sync::Arc;

use serde::Deserialize;

use crate::auth::password;
use crate::error::AppError;
use crate::models::{EndpointChanges, EndpointSummary, NewEndpoint};
use crate::qr::QrEncoder;
use crate::store::{EndpointStore, StoreError};

const MAX_NAME_LEN: usize = 255;

/// Partial update request. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct EndpointUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub password: Option<String>,
}

/// Owns the lifecycle of password-protected endpoints: creation, QR retrieval,
/// listing, partial updates and deletion.
pub struct EndpointManager {
    store: Arc<dyn EndpointStore>,
    encoder: QrEncoder,
}

impl EndpointManager {
    pub fn new(store: Arc<dyn EndpointStore>, encoder: QrEncoder) -> Self {
        Self { store, encoder }
    }

    pub async fn create(
        &self,
        name: &str,
        url: &str,
        password: &str,
    ) -> Result<EndpointSummary, AppError> {
        validate_name(name)?;
        validate_url(url)?;

        // Cheap pre-check so duplicates don't pay for hashing; the store's
        // unique key still decides races.
        if self.store.find_by_name(name).await?.is_some() {
            return Err(AppError::AlreadyExists(format!("{name} already exists")));
        }

        let qr_code = self.encoder.encode(url)?;
        let password_hash = password::hash_blocking(password.to_string())
            .await
            .map_err(AppError::Internal)?;

        let record = self
            .store
            .insert(NewEndpoint {
                name: name.to_string(),
                url: url.to_string(),
                password_hash,
                qr_code,
            })
            .await?;

        tracing::info!(endpoint = %record.name, "Endpoint created");
        Ok(record.into())
    }

    /// Returns the cached PNG. Existence is checked before the password.
    pub async fn fetch_image(&self, name: &str, password: &str) -> Result<Vec<u8>, AppError> {
        let record = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| not_found(name))?;

        self.check_password(password, &record.password_hash).await?;
        Ok(record.qr_code)
    }

    /// Public listing; no password is required.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<EndpointSummary>, AppError> {
        let records = self.store.list(skip, limit).await?;
        Ok(records.into_iter().map(EndpointSummary::from).collect())
    }

    /// Every provided field is written, even when it matches what is stored, so
    /// the store's single atomic update decides the final state.
    pub async fn update(
        &self,
        name: &str,
        update: EndpointUpdate,
    ) -> Result<EndpointSummary, AppError> {
        if self.store.find_by_name(name).await?.is_none() {
            return Err(not_found(name));
        }

        let mut changes = EndpointChanges::default();

        if let Some(new_name) = update.name {
            validate_name(&new_name)?;
            changes.name = Some(new_name);
        }

        if let Some(url) = update.url {
            validate_url(&url)?;
            changes.qr_code = Some(self.encoder.encode(&url)?);
            changes.url = Some(url);
        }

        // Only a newly supplied plaintext is hashed; the stored digest is never touched.
        if let Some(plaintext) = update.password {
            let digest = password::hash_blocking(plaintext)
                .await
                .map_err(AppError::Internal)?;
            changes.password_hash = Some(digest);
        }

        let url_changed = changes.url.is_some();
        let record = self.store.update(name, changes).await?;

        tracing::info!(
            endpoint = %name,
            new_name = %record.name,
            url_changed,
            "Endpoint updated"
        );
        Ok(record.into())
    }

    /// Removes the endpoint after verifying its password. Returns what was deleted.
    ///
    /// The store only removes the exact row that was verified; if it was renamed,
    /// re-keyed or replaced in the meantime nothing is deleted.
    pub async fn delete(&self, name: &str, password: &str) -> Result<EndpointSummary, AppError> {
        let record = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| not_found(name))?;

        self.check_password(password, &record.password_hash).await?;

        let removed = match self.store.delete(&record).await {
            Ok(removed) => removed,
            Err(StoreError::NotFound(_)) => {
                // Whatever now lives under `name` was never verified.
                return Err(match self.store.find_by_name(name).await? {
                    Some(_) => AppError::InvalidCredentials,
                    None => not_found(name),
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(endpoint = %name, "Endpoint deleted");
        Ok(removed.into())
    }

    pub async fn close(&self) {
        self.store.close().await;
    }

    async fn check_password(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let valid = password::verify_blocking(password.to_string(), hash.to_string())
            .await
            .map_err(AppError::Internal)?;
        if valid {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

fn not_found(name: &str) -> AppError {
    AppError::NotFound(format!("{name} does not exist"))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "name must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    if name.contains('/') {
        return Err(AppError::validation("name must not contain '/'"));
    }
    Ok(())
}

/// Accepts absolute URLs with a host, as given (no surrounding whitespace).
fn validate_url(url: &str) -> Result<(), AppError> {
    let invalid = || AppError::InvalidUrl(format!("{url} is not a valid URL"));

    if url.trim() != url {
        return Err(invalid());
    }
    let parsed = url::Url::parse(url).map_err(|_| invalid())?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
