// src/handlers/quiz.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::{question::SubmitQuizRequest, questionnaire},
    services::build_result,
    state::SharedStore,
    utils::html::strip_html,
};

/// Returns the full questionnaire in presentation order.
pub async fn list_questions() -> impl IntoResponse {
    Json(questionnaire().questions())
}

/// Submits a completed quiz.
///
/// * Validates name, e-mail and the answer set (every question exactly once, values 0..=2).
/// * Scores the answers per category and picks the winning womb type.
/// * Persists the result and returns it with `201 Created`.
pub async fn submit_quiz(
    State(store): State<SharedStore>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let name = strip_html(&req.name);
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must contain plain text".to_string()));
    }

    let questions = questionnaire();
    let answers = questions.collect_answers(&req.answers)?;
    let new_result = build_result(name, req.email.trim().to_string(), &answers, questions)?;

    let stored = store.insert(new_result).await?;
    tracing::info!(
        "Stored quiz result {} ({}, score {})",
        stored.id,
        stored.category,
        stored.score()
    );

    Ok((StatusCode::CREATED, Json(stored)))
}
