//!
//! # Custom Error Handling
//!
//! Two error types live here.
//!
//! `StoreError` is what every store operation returns on failure. It keeps the cause
//! (validation, duplicate key, backend failure) so tests can inspect it.
//!
//! `AppError` is the handler-boundary error. It implements
//! `actix_web::error::ResponseError`, so handlers can return it directly and use `?`
//! on store results. Every `StoreError` collapses to a bare `400 Bad Request`; the
//! caller never sees which store failure happened.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Failure of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The document does not satisfy the collection's schema (e.g. empty `text`).
    Validation(String),
    /// A unique constraint was violated (e.g. an email already registered).
    Duplicate(String),
    /// Connectivity, query or any other backend failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            StoreError::Duplicate(msg) => write!(f, "Duplicate Key: {}", msg),
            StoreError::Backend(msg) => write!(f, "Store Error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Converts `sqlx::Error` into `StoreError`.
///
/// Unique violations become `StoreError::Duplicate`, check violations become
/// `StoreError::Validation`, everything else is a backend failure.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                StoreError::Validation(db.message().to_string())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(error: ValidationErrors) -> StoreError {
        StoreError::Validation(error.to_string())
    }
}

/// Represents all errors a request handler can end with.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or unknown auth token (HTTP 401).
    Unauthorized(String),
    /// Any store failure, including schema validation (HTTP 400, empty body).
    BadRequest(String),
    /// Malformed identifier or no matching document (HTTP 404, empty body).
    NotFound(String),
    /// Token signing or password hashing failed (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // No detail leaves the process for store or lookup failures.
            AppError::BadRequest(_) | AppError::NotFound(_) => {
                HttpResponse::build(self.status_code()).finish()
            }
            AppError::Unauthorized(msg) | AppError::InternalServerError(msg) => {
                HttpResponse::build(self.status_code()).json(json!({
                    "error": msg
                }))
            }
        }
    }
}

/// Collapses every store failure into `AppError::BadRequest`.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        log::warn!("store operation failed: {}", error);
        AppError::BadRequest(error.to_string())
    }
}

/// Input validation failures are reported the same way as store validation.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::from(StoreError::from(error))
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
