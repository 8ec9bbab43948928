use std::sync::Arc;

use anyhow::Result;

use crate::catalog::Topic;
use crate::models::TopicAggregate;
use crate::services::attempt_store::AttemptStore;

/// Average score below which a topic counts as weak.
const WEAK_SCORE_THRESHOLD: f64 = 70.0;

/// Picks the next aptitude topic to study: weakest first, then least
/// practiced once everything is strong.
pub struct TopicRecommender {
    attempts: Arc<dyn AttemptStore>,
}

impl TopicRecommender {
    pub fn new(attempts: Arc<dyn AttemptStore>) -> Self {
        Self { attempts }
    }

    pub async fn suggest_next(&self, username: &str) -> Result<Topic> {
        let aggregates = self.attempts.aptitude_aggregates(Some(username)).await?;
        let suggested = pick_next(&aggregates);
        tracing::debug!(
            "Topic suggestion for user={}: {}",
            username,
            suggested.title()
        );
        Ok(suggested)
    }
}

/// Topics never attempted are excluded from comparison, not scored as
/// zero. Ties break on `Topic::ALL` order (strict comparisons keep the
/// first seen).
fn pick_next(aggregates: &[TopicAggregate]) -> Topic {
    let attempted: Vec<(Topic, &TopicAggregate)> = Topic::ALL
        .iter()
        .filter_map(|topic| {
            aggregates
                .iter()
                .find(|a| a.topic == topic.title())
                .map(|a| (*topic, a))
        })
        .collect();

    if attempted.is_empty() {
        // start with the basics
        return Topic::ALL[0];
    }

    let mut weakest: Option<(Topic, f64)> = None;
    for (topic, aggregate) in &attempted {
        if aggregate.avg_score_pct < WEAK_SCORE_THRESHOLD
            && weakest.is_none_or(|(_, score)| aggregate.avg_score_pct < score)
        {
            weakest = Some((*topic, aggregate.avg_score_pct));
        }
    }
    if let Some((topic, _)) = weakest {
        return topic;
    }

    // all topics strong: encourage breadth
    attempted
        .iter()
        .min_by_key(|(_, a)| a.attempt_count)
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::ALL[0])
}
