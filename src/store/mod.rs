// src/store/mod.rs

use std::fmt;

use async_trait::async_trait;

use crate::{
    error::ValidationError,
    models::{NewQuizResult, QuizResult},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryResultStore;
pub use postgres::PgResultStore;

/// Persistence boundary for quiz results.
///
/// The store assigns `id` and `created_at`. Results are never updated or deleted.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn insert(&self, result: NewQuizResult) -> Result<QuizResult, StorageError>;

    /// Every stored result, ordered by id.
    async fn list_all(&self) -> Result<Vec<QuizResult>, StorageError>;

    async fn fetch(&self, id: i64) -> Result<Option<QuizResult>, StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    /// The backend could not be reached or rejected the query.
    Unavailable(String),
    /// A stored row does not decode into a valid result.
    Corrupt { id: i64, source: ValidationError },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "result store unavailable: {}", msg),
            StorageError::Corrupt { id, source } => {
                write!(f, "stored result {} is invalid: {}", id, source)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Unavailable(_) => None,
            StorageError::Corrupt { source, .. } => Some(source),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}
