use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Question;

/// Ephemeral per-user quiz state, held in the session store for the
/// duration of one pass through a topic's question bank.
///
/// Invariant: `index == answers.len()` at all times and `index` never
/// decreases. Transitions return new values instead of mutating shared
/// fields; the owning session store does the read-modify-write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub topic: String,
    pub answers: Vec<String>,
    pub index: usize,
    pub started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn start(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            answers: Vec::new(),
            index: 0,
            started_at: Utc::now(),
        }
    }

    /// Appends one answer and advances the cursor.
    pub fn record_answer(mut self, answer: String) -> Self {
        self.answers.push(answer);
        self.index += 1;
        self
    }

    pub fn is_complete(&self, total: usize) -> bool {
        self.index >= total
    }

    /// Terminal score over the topic's question bank. Only meaningful
    /// once `is_complete` holds.
    pub fn score(&self, questions: &[Question]) -> QuizScore {
        let total = questions.len() as u32;
        let score = questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| q.answer == a.as_str())
            .count() as u32;
        let percent = if total > 0 { score * 100 / total } else { 0 };
        QuizScore {
            score,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub score: u32,
    pub total: u32,
    pub percent: u32,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Absent when the learner submitted without selecting an option;
    /// the machine re-prompts the same question.
    pub answer: Option<String>,
}

/// What the learner sees next: either the current question or the
/// terminal result of the pass.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizStep {
    InProgress {
        topic: String,
        question: QuestionView,
        index: usize,
        total: usize,
        /// `floor(index / total * 100)`
        progress: u32,
    },
    Finished {
        topic: String,
        score: u32,
        total: u32,
        percent: u32,
    },
}

#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub text: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            text: q.text.to_string(),
            options: q.options.iter().map(|o| o.to_string()).collect(),
        }
    }
}
