use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// JSON body extractor whose parse failures become 422 responses that echo the
/// body back. Transport failures (e.g. body too large) keep axum's own status.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        serde_json::from_slice::<T>(&bytes)
            .map(ValidatedJson)
            .map_err(|e| {
                AppError::Validation {
                    detail: format!("Invalid request body: {e}"),
                    body: echo_body(&bytes),
                }
                .into_response()
            })
    }
}

fn echo_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Query-string extractor that reports bad parameters as 422 validation errors.
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri).map_err(|e| {
            AppError::Validation {
                detail: e.body_text(),
                body: parts
                    .uri
                    .query()
                    .map(|q| Value::String(q.to_string()))
                    .unwrap_or(Value::Null),
            }
        })?;
        Ok(ValidatedQuery(value))
    }
}
