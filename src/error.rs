//!
//! # Error Handling
//!
//! This module defines the application error type `AppError` used by the
//! stores, services and route handlers. Each variant names one failure class
//! from the service contracts: invalid input, duplicate username, missing
//! user/task, a mutation attempted by a user who is neither creator nor
//! assignee, or bad credentials.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so a handler
//! returning `Result<_, AppError>` maps straight onto an HTTP response with
//! a `{"message": "..."}` JSON body. Each variant gets its own status code
//! rather than collapsing everything into a generic 400.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All failure classes surfaced by the service layer.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 422).
    Validation(String),
    /// Bad credentials on login (HTTP 401).
    Authentication(String),
    /// Mutation attempted by a user who is neither creator nor assignee (HTTP 403).
    Authorization(String),
    /// Referenced user or task does not exist (HTTP 404).
    NotFound(String),
    /// Duplicate username, or a delete blocked by referencing tasks (HTTP 409).
    Conflict(String),
    /// Error from the storage backend (HTTP 500).
    Database(String),
    /// Anything else that should not reach the client in detail (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Authentication(msg) => write!(f, "Authentication Error: {}", msg),
            AppError::Authorization(msg) => write!(f, "Authorization Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "message": msg
            })),
            AppError::Authentication(msg) => HttpResponse::Unauthorized().json(json!({
                "message": msg
            })),
            AppError::Authorization(msg) => HttpResponse::Forbidden().json(json!({
                "message": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "message": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "message": msg
            })),
            AppError::Database(msg) => HttpResponse::InternalServerError().json(json!({
                "message": msg
            })),
            AppError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "message": msg
            })),
        }
    }
}

/// Maps `sqlx::Error` onto the taxonomy.
///
/// `RowNotFound` becomes `NotFound`; a unique-constraint violation (the
/// `users.username` index) becomes `Conflict`; everything else is a
/// `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Username already exists".into())
            }
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// JWT processing failures surface as authentication errors.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Authentication(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
