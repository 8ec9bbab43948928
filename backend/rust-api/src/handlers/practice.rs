use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::catalog::CODING_TOPICS;
use crate::extractors::AppJson;
use crate::metrics::CODING_ATTEMPTS_TOTAL;
use crate::middlewares::auth::JwtClaims;
use crate::models::{Difficulty, ProblemView, TrackCodingAttemptRequest};
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct ProblemQuery {
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
}

/// Random practice problem for a topic/difficulty pair.
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProblemQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let (Some(topic), Some(difficulty)) = (query.topic, query.difficulty) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing topic or difficulty" })),
        ));
    };

    if !CODING_TOPICS.contains(&topic.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No question found" })),
        ));
    }

    let mut rng = rand::rng();
    match state.problems.pick(&topic, difficulty, &mut rng) {
        Some(problem) => Ok((StatusCode::OK, Json(ProblemView::from(problem)))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No question found" })),
        )),
    }
}

/// Records one coding-practice attempt for the model aggregates.
pub async fn track_attempt(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<TrackCodingAttemptRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(validation) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, validation.to_string()));
    }

    let attempt = req.into_attempt(&claims.sub);
    tracing::info!(
        "Tracking coding attempt: user={}, topic={}, difficulty={}",
        attempt.username,
        attempt.topic,
        attempt.difficulty
    );

    match state.attempts.insert_coding_attempt(&attempt).await {
        Ok(()) => {
            CODING_ATTEMPTS_TOTAL
                .with_label_values(&[
                    attempt.difficulty.as_str(),
                    if attempt.completed { "true" } else { "false" },
                ])
                .inc();
            Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
        }
        Err(e) => {
            tracing::error!("Failed to track coding attempt: {:#}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
