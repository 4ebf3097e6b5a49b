// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::store::StorageError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Malformed answer or result shapes.
///
/// Raised synchronously wherever loosely typed input becomes a domain value:
/// a quiz submission, a stored row, or a refresh payload. Never retryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownCategory(String),
    AnswerOutOfRange(i64),
    ScoreOutOfRange { category: String, score: i64 },
    MissingScore(String),
    UnknownQuestion(u32),
    DuplicateAnswer(u32),
    MissingAnswer(u32),
    Malformed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownCategory(name) => write!(f, "unknown category '{}'", name),
            ValidationError::AnswerOutOfRange(value) => {
                write!(f, "answer value {} is outside 0..=2", value)
            }
            ValidationError::ScoreOutOfRange { category, score } => {
                write!(f, "score {} for {} is outside 0..={}", score, category, u32::MAX)
            }
            ValidationError::MissingScore(category) => {
                write!(f, "score set is missing category {}", category)
            }
            ValidationError::UnknownQuestion(id) => write!(f, "question {} does not exist", id),
            ValidationError::DuplicateAnswer(id) => {
                write!(f, "question {} was answered more than once", id)
            }
            ValidationError::MissingAnswer(id) => write!(f, "question {} was not answered", id),
            ValidationError::Malformed(msg) => write!(f, "malformed record: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Client-side shape errors are the caller's fault.
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Converts `StorageError` into `AppError::InternalServerError`.
/// Allows using `?` operator on store calls.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
