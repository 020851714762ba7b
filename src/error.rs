use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::qr::EncodeError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    InvalidUrl(String),
    AlreadyExists(String),
    NotFound(String),
    InvalidCredentials,
    Encoding(String),
    /// Malformed request input. `body` echoes what the client sent, when known.
    Validation { detail: String, body: Value },
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    pub fn validation(detail: impl Into<String>) -> Self {
        AppError::Validation {
            detail: detail.into(),
            body: Value::Null,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            AppError::AlreadyExists(msg) => write!(f, "Already Exists: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Encoding(msg) => write!(f, "Encoding Error: {msg}"),
            AppError::Validation { detail, .. } => write!(f, "Validation Error: {detail}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidUrl(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid Password".to_string())
            }
            AppError::Encoding(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation { detail, body } => {
                let body = json!({ "detail": detail, "body": body });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "detail": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(name) => {
                AppError::AlreadyExists(format!("{name} already exists"))
            }
            StoreError::NotFound(name) => AppError::NotFound(format!("{name} does not exist")),
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::DataTooLong => {
                AppError::Encoding("url is too long to encode as a QR code".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
