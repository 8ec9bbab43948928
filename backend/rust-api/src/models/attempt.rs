use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Coding problem difficulty tier. Serialized exactly as stored in
/// attempt records ("Easy" / "Medium" / "Hard").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed aptitude quiz. Immutable once written;
/// `score <= total_questions` and `total_questions > 0` by construction
/// (the quiz machine rejects empty topics before a session starts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeAttempt {
    pub id: String,
    pub username: String,
    pub topic: String,
    pub score: u32,
    pub total_questions: u32,
    pub timestamp: DateTime<Utc>,
}

impl AptitudeAttempt {
    pub fn new(username: &str, topic: &str, score: u32, total_questions: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            topic: topic.to_string(),
            score,
            total_questions,
            timestamp: Utc::now(),
        }
    }

    /// Score as a percentage of the questions asked.
    pub fn score_pct(&self) -> f64 {
        (self.score as f64 / self.total_questions as f64) * 100.0
    }
}

/// One coding-practice submission, written by the tracking endpoint
/// after a learner attempts a problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodingAttempt {
    pub id: String,
    pub username: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Seconds spent before submitting; 0 when the client did not track time.
    pub time_spent: i64,
    pub completed: bool,
    pub hints_used: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TrackCodingAttemptRequest {
    #[serde(default = "default_topic")]
    #[validate(length(min = 1, max = 128))]
    pub topic: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub time_spent: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    #[validate(range(max = 50))]
    pub hints_used: u32,
}

fn default_topic() -> String {
    "unknown".to_string()
}

fn default_difficulty() -> Difficulty {
    Difficulty::Easy
}

impl TrackCodingAttemptRequest {
    pub fn into_attempt(self, username: &str) -> CodingAttempt {
        CodingAttempt {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            topic: self.topic,
            difficulty: self.difficulty,
            time_spent: self.time_spent,
            completed: self.completed,
            hints_used: self.hints_used,
            timestamp: Utc::now(),
        }
    }
}

/// Per (user, topic) aptitude summary, derived on demand from raw
/// attempts. Never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicAggregate {
    pub username: String,
    pub topic: String,
    pub avg_score_pct: f64,
    pub attempt_count: u64,
    pub last_attempt: DateTime<Utc>,
}

/// Lifetime aptitude summary for a single user.
#[derive(Debug, Clone, Copy)]
pub struct UserSummary {
    pub avg_score_pct: f64,
    pub attempts: u64,
}

/// Per (user, topic, difficulty) coding summary, derived on demand.
#[derive(Debug, Clone, Copy)]
pub struct DifficultyAggregate {
    pub difficulty: Difficulty,
    pub success_rate: f64,
    pub attempt_count: u64,
    /// Mean seconds per attempt; populated with a 30-minute default by
    /// readers when no attempt carried a time value.
    pub avg_time_spent: f64,
}
