use std::sync::Arc;

use anyhow::Result;

use crate::models::{Difficulty, DifficultyAggregate};
use crate::services::attempt_store::AttemptStore;

/// Easy-tier mastery thresholds: success rate and mean solve time
/// (20 minutes) both required before promotion.
const MASTERY_SUCCESS_RATE: f64 = 0.8;
const MASTERY_MAX_AVG_TIME: f64 = 1200.0;
/// Medium-tier success rate required to promote to Hard.
const MEDIUM_PROMOTION_RATE: f64 = 0.6;

/// Rule-based "graduate on mastery" classifier over the user's coding
/// history for one topic. Regression to Easy is the safe default
/// whenever evidence is missing or weak.
pub struct DifficultyRecommender {
    attempts: Arc<dyn AttemptStore>,
}

impl DifficultyRecommender {
    pub fn new(attempts: Arc<dyn AttemptStore>) -> Self {
        Self { attempts }
    }

    pub async fn recommend(&self, username: &str, topic: &str) -> Result<Difficulty> {
        let stats = self.attempts.coding_aggregates(username, topic).await?;
        let recommended = decide(&stats);
        tracing::debug!(
            "Difficulty recommendation for user={}, topic={}: {}",
            username,
            topic,
            recommended
        );
        Ok(recommended)
    }
}

/// Decision policy, evaluated in order:
/// 1. no history → Easy
/// 2. no Easy rows → Easy
/// 3. Easy mastered (≥ 0.8 success, < 1200s avg):
///    Medium attempted with ≥ 0.6 success → Hard, else → Medium
/// 4. otherwise → Easy
fn decide(stats: &[DifficultyAggregate]) -> Difficulty {
    let tier = |d: Difficulty| stats.iter().find(|a| a.difficulty == d);

    let Some(easy) = tier(Difficulty::Easy) else {
        return Difficulty::Easy;
    };

    if easy.success_rate >= MASTERY_SUCCESS_RATE && easy.avg_time_spent < MASTERY_MAX_AVG_TIME {
        match tier(Difficulty::Medium) {
            Some(medium) if medium.success_rate >= MEDIUM_PROMOTION_RATE => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    } else {
        Difficulty::Easy
    }
}
