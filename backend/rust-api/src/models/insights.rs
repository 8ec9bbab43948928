use serde::Serialize;

use super::Difficulty;

/// Combined recommendations payload surfaced after invoking all three
/// recommenders. `predicted_score` is `null` when the model is
/// untrained or untrainable; a missing prediction is advisory and must
/// never fail the request.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub next_topic: String,
    pub predicted_score: Option<f64>,
    pub recommended_difficulty: Difficulty,
    pub total_attempts: u64,
    pub avg_performance_pct: f64,
}
