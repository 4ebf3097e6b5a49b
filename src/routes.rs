// src/routes.rs

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{analytics, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the quiz and analytics sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (result store, configuration).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let quiz_routes = Router::new()
        .route("/questions", get(quiz::list_questions))
        .route("/submit", post(quiz::submit_quiz));

    let analytics_routes = Router::new()
        .route("/summary", get(analytics::get_summary))
        .route("/results/{id}", get(analytics::get_respondent));

    Router::new()
        .route("/health", get(health))
        // Polled by the dashboard; the path is fixed by the frontend.
        .route("/analytics", post(analytics::refresh_results))
        .nest("/api/quiz", quiz_routes)
        .nest("/api/analytics", analytics_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// `*` anywhere in the list allows every origin; it cannot be mixed with a list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        if origins.len() > 1 {
            tracing::warn!("CORS_ORIGINS contains '*', ignoring the other origins");
        }
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
