// src/store/postgres.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, prelude::FromRow, types::Json};

use super::{ResultStore, StorageError};
use crate::{
    error::ValidationError,
    models::{Category, NewQuizResult, QuestionId, QuizResult, RecordedAnswer, ScoreSet},
};

/// Represents the 'quiz_results' table in the database.
/// `scores` and `answers` are JSONB and are validated on the way out.
#[derive(Debug, FromRow)]
struct QuizResultRow {
    id: i64,
    name: String,
    email: String,
    category: String,
    scores: Json<serde_json::Value>,
    answers: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl QuizResultRow {
    fn decode(self) -> Result<QuizResult, ValidationError> {
        let category: Category = self.category.parse()?;

        let raw_scores: BTreeMap<String, i64> = serde_json::from_value(self.scores.0)
            .map_err(|e| ValidationError::Malformed(format!("scores: {}", e)))?;
        let scores = ScoreSet::try_from(raw_scores)?;

        let answers: BTreeMap<QuestionId, RecordedAnswer> =
            serde_json::from_value(self.answers.0)
                .map_err(|e| ValidationError::Malformed(format!("answers: {}", e)))?;

        Ok(QuizResult {
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
            category,
            scores,
            answers,
        })
    }

    fn into_result(self) -> Result<QuizResult, StorageError> {
        let id = self.id;
        self.decode().map_err(|source| {
            tracing::error!("Stored result {} failed validation: {}", id, source);
            StorageError::Corrupt { id, source }
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, email, category, scores, answers, created_at";

/// PostgreSQL-backed result store.
#[derive(Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn insert(&self, result: NewQuizResult) -> Result<QuizResult, StorageError> {
        let row = sqlx::query_as::<_, QuizResultRow>(&format!(
            r#"
            INSERT INTO quiz_results (name, email, category, scores, answers)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&result.name)
        .bind(&result.email)
        .bind(result.category.as_str())
        .bind(Json(&result.scores))
        .bind(Json(&result.answers))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert quiz result: {:?}", e);
            StorageError::from(e)
        })?;

        row.into_result()
    }

    async fn list_all(&self) -> Result<Vec<QuizResult>, StorageError> {
        let rows = sqlx::query_as::<_, QuizResultRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM quiz_results ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quiz results: {:?}", e);
            StorageError::from(e)
        })?;

        rows.into_iter().map(QuizResultRow::into_result).collect()
    }

    async fn fetch(&self, id: i64) -> Result<Option<QuizResult>, StorageError> {
        let row = sqlx::query_as::<_, QuizResultRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM quiz_results WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz result {}: {:?}", id, e);
            StorageError::from(e)
        })?;

        row.map(QuizResultRow::into_result).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, scores: serde_json::Value, answers: serde_json::Value) -> QuizResultRow {
        QuizResultRow {
            id: 42,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            category: category.to_string(),
            scores: Json(scores),
            answers: Json(answers),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_decode_valid_row() {
        let result = row(
            "DAMP",
            serde_json::json!({"HOT": 1, "DAMP": 6, "STUCK": 0, "COLD": 2}),
            serde_json::json!({"6": {"category": "DAMP", "question": "q", "answer": 2}}),
        )
        .into_result()
        .unwrap();

        assert_eq!(result.category, Category::Damp);
        assert_eq!(result.score(), 6);
        assert_eq!(result.answers[&6].question, "q");
    }

    #[test]
    fn test_decode_rejects_category_outside_scores() {
        let err = row(
            "WARM",
            serde_json::json!({"HOT": 1, "DAMP": 6, "STUCK": 0, "COLD": 2}),
            serde_json::json!({}),
        )
        .into_result()
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Corrupt {
                id: 42,
                source: ValidationError::UnknownCategory(_)
            }
        ));

        let err = row("HOT", serde_json::json!({"DAMP": 6}), serde_json::json!({}))
            .into_result()
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Corrupt {
                source: ValidationError::MissingScore(_),
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_bad_answer_value() {
        let err = row(
            "HOT",
            serde_json::json!({"HOT": 1, "DAMP": 0, "STUCK": 0, "COLD": 0}),
            serde_json::json!({"1": {"category": "HOT", "question": "q", "answer": 5}}),
        )
        .into_result()
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Corrupt {
                source: ValidationError::Malformed(_),
                ..
            }
        ));
    }
}
