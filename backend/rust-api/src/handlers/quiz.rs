use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::extractors::AppJson;
use crate::middlewares::auth::JwtClaims;
use crate::models::SubmitAnswerRequest;
use crate::services::quiz_service::QuizError;
use crate::services::AppState;

pub async fn current_question(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(topic): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Quiz step for user={}, topic={}", claims.sub, topic);

    match state.quiz.current_step(&claims.sub, &topic).await {
        Ok(step) => Ok((StatusCode::OK, Json(step))),
        Err(e) => Err(map_quiz_error(e)),
    }
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(topic): Path<String>,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Answer submission for user={}, topic={}", claims.sub, topic);

    match state.quiz.submit(&claims.sub, &topic, req.answer).await {
        Ok(step) => Ok((StatusCode::OK, Json(step))),
        Err(e) => Err(map_quiz_error(e)),
    }
}

fn map_quiz_error(e: anyhow::Error) -> (StatusCode, String) {
    if e.downcast_ref::<QuizError>().is_some() {
        (StatusCode::NOT_FOUND, e.to_string())
    } else {
        tracing::error!("Quiz step failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}
