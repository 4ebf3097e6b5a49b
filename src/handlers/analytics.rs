// src/handlers/analytics.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    models::{Category, QuizResult},
    services::{aggregation::AnswerDetail, dashboard_view, drill_down},
    state::SharedStore,
};

/// Payload of the dashboard refresh endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultsPayload {
    pub results: Vec<QuizResult>,
}

/// Detail view for one respondent.
#[derive(Debug, Serialize)]
pub struct RespondentDetail {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub category: Category,
    pub answers: Vec<AnswerDetail>,
}

/// Dashboard refresh endpoint. Takes no body and returns every stored result.
pub async fn refresh_results(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let results = store.list_all().await?;
    Ok(Json(ResultsPayload { results }))
}

/// Aggregates all stored results into the dashboard view.
pub async fn get_summary(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let results = store.list_all().await?;
    Ok(Json(dashboard_view(&results)))
}

/// Returns one respondent's answers, grouped by category.
pub async fn get_respondent(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = store
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Result {} not found", id)))?;

    Ok(Json(RespondentDetail {
        id: result.id,
        answers: drill_down(&result),
        name: result.name,
        email: result.email,
        category: result.category,
    }))
}
