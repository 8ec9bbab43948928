use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::middlewares::auth::JwtClaims;
use crate::models::InsightsResponse;
use crate::services::AppState;

/// Coding topic probed for the difficulty recommendation on the
/// insights page.
const PROBE_CODING_TOPIC: &str = "array";

/// Combined payload from all three recommenders plus lifetime stats.
/// A missing prediction resolves to `null`, never to a failure; only
/// store errors surface as 500.
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let username = &claims.sub;
    tracing::info!("Computing insights for user={}", username);

    let next_topic = state
        .topics
        .suggest_next(username)
        .await
        .map_err(internal)?;

    let predicted_score = state
        .predictor
        .predict(username, next_topic.title())
        .await
        .map_err(internal)?;

    let recommended_difficulty = state
        .difficulty
        .recommend(username, PROBE_CODING_TOPIC)
        .await
        .map_err(internal)?;

    let summary = state.attempts.user_summary(username).await.map_err(internal)?;

    let response = InsightsResponse {
        next_topic: next_topic.title().to_string(),
        predicted_score: predicted_score.map(round1),
        recommended_difficulty,
        total_attempts: summary.map(|s| s.attempts).unwrap_or(0),
        avg_performance_pct: summary.map(|s| round1(s.avg_score_pct)).unwrap_or(0.0),
    };

    Ok((StatusCode::OK, Json(response)))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!("Insights computation failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
