use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Database;

use crate::metrics::track_db_operation;
use crate::models::{
    AptitudeAttempt, CodingAttempt, Difficulty, DifficultyAggregate, TopicAggregate, UserSummary,
};
use crate::utils::retry::{with_retries, RetryConfig};

/// Fallback mean solve time (30 min) when no attempt at a difficulty
/// carries a time value.
pub const DEFAULT_AVG_TIME_SPENT: f64 = 1800.0;

/// Narrow query interface over the durable attempt history. The
/// recommenders never mutate stored records; all reads are by-value
/// snapshots.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert_aptitude_attempt(&self, attempt: &AptitudeAttempt) -> Result<()>;

    async fn insert_coding_attempt(&self, attempt: &CodingAttempt) -> Result<()>;

    /// Per (username, topic) aptitude aggregates, for one user or
    /// system-wide, in a deterministic order.
    async fn aptitude_aggregates(&self, username: Option<&str>) -> Result<Vec<TopicAggregate>>;

    /// Lifetime average score and attempt count for one user; `None`
    /// when the user has no aptitude attempts at all.
    async fn user_summary(&self, username: &str) -> Result<Option<UserSummary>>;

    /// Per-difficulty coding aggregates for one (user, topic).
    async fn coding_aggregates(
        &self,
        username: &str,
        topic: &str,
    ) -> Result<Vec<DifficultyAggregate>>;

    async fn ping(&self) -> Result<()>;
}

const APTITUDE_COLLECTION: &str = "aptitude_attempts";
const CODING_COLLECTION: &str = "coding_attempts";

pub struct MongoAttemptStore {
    mongo: Database,
}

impl MongoAttemptStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    async fn fetch_aptitude(&self, username: Option<&str>) -> Result<Vec<AptitudeAttempt>> {
        let collection = self.mongo.collection::<AptitudeAttempt>(APTITUDE_COLLECTION);
        let filter = match username {
            Some(name) => doc! { "username": name },
            None => doc! {},
        };

        track_db_operation("find", APTITUDE_COLLECTION, async {
            let cursor = collection
                .find(filter)
                .await
                .context("Failed to query aptitude attempts")?;
            cursor
                .try_collect()
                .await
                .context("Failed to read aptitude attempts")
        })
        .await
    }
}

#[async_trait]
impl AttemptStore for MongoAttemptStore {
    async fn insert_aptitude_attempt(&self, attempt: &AptitudeAttempt) -> Result<()> {
        let collection = self.mongo.collection::<AptitudeAttempt>(APTITUDE_COLLECTION);

        track_db_operation("insert", APTITUDE_COLLECTION, async {
            with_retries(RetryConfig::aggressive(), || async {
                collection.insert_one(attempt).await.map(|_| ())
            })
            .await
            .context("Failed to insert aptitude attempt")
        })
        .await?;

        tracing::info!(
            "Aptitude attempt saved: user={}, topic={}, score={}/{}",
            attempt.username,
            attempt.topic,
            attempt.score,
            attempt.total_questions
        );
        Ok(())
    }

    async fn insert_coding_attempt(&self, attempt: &CodingAttempt) -> Result<()> {
        let collection = self.mongo.collection::<CodingAttempt>(CODING_COLLECTION);

        track_db_operation("insert", CODING_COLLECTION, async {
            with_retries(RetryConfig::aggressive(), || async {
                collection.insert_one(attempt).await.map(|_| ())
            })
            .await
            .context("Failed to insert coding attempt")
        })
        .await?;

        tracing::info!(
            "Coding attempt saved: user={}, topic={}, difficulty={}, completed={}",
            attempt.username,
            attempt.topic,
            attempt.difficulty,
            attempt.completed
        );
        Ok(())
    }

    async fn aptitude_aggregates(&self, username: Option<&str>) -> Result<Vec<TopicAggregate>> {
        let attempts = self.fetch_aptitude(username).await?;
        Ok(aggregate_aptitude(&attempts))
    }

    async fn user_summary(&self, username: &str) -> Result<Option<UserSummary>> {
        let attempts = self.fetch_aptitude(Some(username)).await?;
        Ok(summarize_user(&attempts))
    }

    async fn coding_aggregates(
        &self,
        username: &str,
        topic: &str,
    ) -> Result<Vec<DifficultyAggregate>> {
        let collection = self.mongo.collection::<CodingAttempt>(CODING_COLLECTION);
        let filter = doc! { "username": username, "topic": topic };

        let attempts: Vec<CodingAttempt> = track_db_operation("find", CODING_COLLECTION, async {
            let cursor = collection
                .find(filter)
                .await
                .context("Failed to query coding attempts")?;
            cursor
                .try_collect()
                .await
                .context("Failed to read coding attempts")
        })
        .await?;

        Ok(aggregate_coding(&attempts))
    }

    async fn ping(&self) -> Result<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}

/// Folds raw aptitude attempts into per (user, topic) aggregates.
/// BTreeMap keeps the output order deterministic.
pub fn aggregate_aptitude(attempts: &[AptitudeAttempt]) -> Vec<TopicAggregate> {
    let mut groups: BTreeMap<(String, String), (f64, u64, chrono::DateTime<chrono::Utc>)> =
        BTreeMap::new();

    for attempt in attempts {
        let key = (attempt.username.clone(), attempt.topic.clone());
        let entry = groups
            .entry(key)
            .or_insert((0.0, 0, attempt.timestamp));
        entry.0 += attempt.score_pct();
        entry.1 += 1;
        entry.2 = entry.2.max(attempt.timestamp);
    }

    groups
        .into_iter()
        .map(
            |((username, topic), (pct_sum, count, last_attempt))| TopicAggregate {
                username,
                topic,
                avg_score_pct: pct_sum / count as f64,
                attempt_count: count,
                last_attempt,
            },
        )
        .collect()
}

pub fn summarize_user(attempts: &[AptitudeAttempt]) -> Option<UserSummary> {
    if attempts.is_empty() {
        return None;
    }
    let pct_sum: f64 = attempts.iter().map(|a| a.score_pct()).sum();
    Some(UserSummary {
        avg_score_pct: pct_sum / attempts.len() as f64,
        attempts: attempts.len() as u64,
    })
}

/// Folds raw coding attempts into per-difficulty aggregates. Attempts
/// with `time_spent == 0` don't carry a time value; a difficulty where
/// none do gets [`DEFAULT_AVG_TIME_SPENT`].
pub fn aggregate_coding(attempts: &[CodingAttempt]) -> Vec<DifficultyAggregate> {
    struct Acc {
        attempts: u64,
        completed: u64,
        timed: u64,
        time_sum: f64,
    }

    let mut groups: BTreeMap<&'static str, (Difficulty, Acc)> = BTreeMap::new();

    for attempt in attempts {
        let (_, acc) = groups
            .entry(attempt.difficulty.as_str())
            .or_insert_with(|| {
                (
                    attempt.difficulty,
                    Acc {
                        attempts: 0,
                        completed: 0,
                        timed: 0,
                        time_sum: 0.0,
                    },
                )
            });
        acc.attempts += 1;
        if attempt.completed {
            acc.completed += 1;
        }
        if attempt.time_spent > 0 {
            acc.timed += 1;
            acc.time_sum += attempt.time_spent as f64;
        }
    }

    groups
        .into_values()
        .map(|(difficulty, acc)| DifficultyAggregate {
            difficulty,
            success_rate: acc.completed as f64 / acc.attempts as f64,
            attempt_count: acc.attempts,
            avg_time_spent: if acc.timed > 0 {
                acc.time_sum / acc.timed as f64
            } else {
                DEFAULT_AVG_TIME_SPENT
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aptitude(username: &str, topic: &str, score: u32, total: u32) -> AptitudeAttempt {
        AptitudeAttempt::new(username, topic, score, total)
    }

    fn coding(difficulty: Difficulty, completed: bool, time_spent: i64) -> CodingAttempt {
        CodingAttempt {
            id: "test".into(),
            username: "alice".into(),
            topic: "array".into(),
            difficulty,
            time_spent,
            completed,
            hints_used: 0,
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn aptitude_aggregates_average_per_attempt_percentages() {
        let attempts = vec![
            aptitude("alice", "Percentages", 5, 10), // 50%
            aptitude("alice", "Percentages", 9, 10), // 90%
            aptitude("alice", "Time and Work", 1, 1), // 100%
        ];

        let aggregates = aggregate_aptitude(&attempts);
        assert_eq!(aggregates.len(), 2);

        let pct = aggregates
            .iter()
            .find(|a| a.topic == "Percentages")
            .unwrap();
        assert!((pct.avg_score_pct - 70.0).abs() < 1e-9);
        assert_eq!(pct.attempt_count, 2);
    }

    #[test]
    fn user_summary_is_none_without_history() {
        assert!(summarize_user(&[]).is_none());
    }

    #[test]
    fn coding_aggregates_compute_success_rate_and_time() {
        let attempts = vec![
            coding(Difficulty::Easy, true, 600),
            coding(Difficulty::Easy, true, 800),
            coding(Difficulty::Easy, false, 0),
            coding(Difficulty::Medium, false, 0),
        ];

        let aggregates = aggregate_coding(&attempts);
        let easy = aggregates
            .iter()
            .find(|a| a.difficulty == Difficulty::Easy)
            .unwrap();
        assert!((easy.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(easy.attempt_count, 3);
        assert!((easy.avg_time_spent - 700.0).abs() < 1e-9);

        // no timed Medium attempts falls back to the 30 minute default
        let medium = aggregates
            .iter()
            .find(|a| a.difficulty == Difficulty::Medium)
            .unwrap();
        assert!((medium.avg_time_spent - DEFAULT_AVG_TIME_SPENT).abs() < 1e-9);
    }
}
