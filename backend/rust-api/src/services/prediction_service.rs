use std::sync::{Arc, RwLock};

use anyhow::Result;

use crate::catalog::topic_code;
use crate::metrics::PREDICTOR_TRAININGS_TOTAL;
use crate::services::attempt_store::AttemptStore;
use crate::utils::regression::{LinearModel, NUM_FEATURES};

/// Minimum aggregate rows system-wide before training is attempted.
const MIN_TRAINING_ROWS: usize = 5;

/// Cold-start heuristic for users with no attempt history at all; not
/// a model output.
pub const DEFAULT_PREDICTION: f64 = 65.0;

/// Forecasts a user's expected score on a topic from their aggregate
/// history.
///
/// Trains lazily on first use and caches the fitted coefficients.
/// Concurrent requests may race to train; training is deterministic
/// over the same snapshot, so redundant fits converge and no lock is
/// held across awaits.
pub struct PerformancePredictor {
    attempts: Arc<dyn AttemptStore>,
    model: RwLock<Option<LinearModel>>,
}

impl PerformancePredictor {
    pub fn new(attempts: Arc<dyn AttemptStore>) -> Self {
        Self {
            attempts,
            model: RwLock::new(None),
        }
    }

    fn fitted(&self) -> Option<LinearModel> {
        self.model.read().ok().and_then(|guard| *guard)
    }

    /// One training row per (user, topic) aggregate: features
    /// `[avg_score_pct, attempt_count, topic_code]`, target the same
    /// aggregate score. `None` when fewer than [`MIN_TRAINING_ROWS`]
    /// rows exist.
    async fn prepare_training_data(
        &self,
    ) -> Result<Option<(Vec<[f64; NUM_FEATURES]>, Vec<f64>)>> {
        let rows = self.attempts.aptitude_aggregates(None).await?;
        if rows.len() < MIN_TRAINING_ROWS {
            return Ok(None);
        }

        let mut features = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        for row in &rows {
            features.push([
                row.avg_score_pct,
                row.attempt_count as f64,
                topic_code(&row.topic) as f64,
            ]);
            targets.push(row.avg_score_pct);
        }
        Ok(Some((features, targets)))
    }

    /// Fits the regression over the full attempt history. `Ok(false)`
    /// means insufficient data or a degenerate fit; the predictor then
    /// stays untrained and predictions fall back to defaults.
    pub async fn train(&self) -> Result<bool> {
        let Some((features, targets)) = self.prepare_training_data().await? else {
            PREDICTOR_TRAININGS_TOTAL
                .with_label_values(&["insufficient_data"])
                .inc();
            tracing::debug!("Predictor training skipped: insufficient aggregate rows");
            return Ok(false);
        };

        match LinearModel::fit(&features, &targets) {
            Some(model) => {
                if let Ok(mut guard) = self.model.write() {
                    *guard = Some(model);
                }
                PREDICTOR_TRAININGS_TOTAL
                    .with_label_values(&["success"])
                    .inc();
                tracing::info!("Predictor trained on {} aggregate rows", features.len());
                Ok(true)
            }
            None => {
                PREDICTOR_TRAININGS_TOTAL
                    .with_label_values(&["failed"])
                    .inc();
                tracing::warn!("Predictor fit failed; keeping untrained state");
                Ok(false)
            }
        }
    }

    /// Expected score percentage for the user on a topic.
    ///
    /// - untrained and untrainable → `None` (caller shows a neutral
    ///   message);
    /// - user with zero attempts → fixed [`DEFAULT_PREDICTION`];
    /// - otherwise a model prediction clamped to `[0, 100]`.
    ///
    /// Storage failures propagate; modeling failures never do.
    pub async fn predict(&self, username: &str, topic: &str) -> Result<Option<f64>> {
        if self.fitted().is_none() && !self.train().await? {
            return Ok(None);
        }

        let Some(summary) = self.attempts.user_summary(username).await? else {
            return Ok(Some(DEFAULT_PREDICTION));
        };

        let Some(model) = self.fitted() else {
            return Ok(None);
        };

        let features = [
            summary.avg_score_pct,
            summary.attempts as f64,
            topic_code(topic) as f64,
        ];
        Ok(Some(bounded(&model, &features)))
    }
}

/// Model output bounded to the valid percentage range. The fitted
/// plane extrapolates freely; the published prediction must not.
fn bounded(model: &LinearModel, features: &[f64; NUM_FEATURES]) -> f64 {
    model.predict(features).clamp(0.0, 100.0)
}
