use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;

use crate::catalog::{questions_for, Question, Topic};
use crate::metrics::{QUIZZES_COMPLETED_TOTAL, QUIZ_ANSWERS_TOTAL};
use crate::models::quiz::QuestionView;
use crate::models::{AptitudeAttempt, QuizSession, QuizStep};
use crate::services::attempt_store::AttemptStore;
use crate::services::session_store::QuizSessionStore;

#[derive(Debug, Error)]
pub enum QuizError {
    /// Requested topic has no question bank; rejected before a session
    /// can enter `InProgress` (progress would divide by zero).
    #[error("Unknown quiz topic: {0}")]
    UnknownTopic(String),
}

/// Drives a learner through one topic's ordered question bank.
///
/// State lives in the session store between requests; transitions are
/// single-writer per user. Finishing writes exactly one aptitude
/// attempt and clears the session, so the next visit starts fresh.
pub struct QuizService {
    attempts: Arc<dyn AttemptStore>,
    sessions: Arc<dyn QuizSessionStore>,
}

impl QuizService {
    pub fn new(attempts: Arc<dyn AttemptStore>, sessions: Arc<dyn QuizSessionStore>) -> Self {
        Self { attempts, sessions }
    }

    /// Current question (with progress) for the user's session on this
    /// topic, or the terminal result when the pass is complete.
    pub async fn current_step(&self, username: &str, topic_slug: &str) -> Result<QuizStep> {
        let (topic, questions) = resolve_topic(topic_slug)?;
        let session = self.load_or_start(username, topic).await?;
        self.step(username, topic, questions, session).await
    }

    /// Records one answer when an option was selected; a submission
    /// without a selection re-prompts the same question.
    pub async fn submit(
        &self,
        username: &str,
        topic_slug: &str,
        answer: Option<String>,
    ) -> Result<QuizStep> {
        let (topic, questions) = resolve_topic(topic_slug)?;
        let mut session = self.load_or_start(username, topic).await?;

        let selected = answer.filter(|a| !a.trim().is_empty());
        if let Some(selected) = selected {
            if !session.is_complete(questions.len()) {
                session = session.record_answer(selected);
                self.sessions.save(username, &session).await?;
                QUIZ_ANSWERS_TOTAL
                    .with_label_values(&[topic.title()])
                    .inc();
            }
        }

        self.step(username, topic, questions, session).await
    }

    /// Existing session for the same topic continues; a session for a
    /// different topic is discarded and a fresh one starts at index 0.
    async fn load_or_start(&self, username: &str, topic: Topic) -> Result<QuizSession> {
        match self.sessions.load(username).await? {
            Some(session) if session.topic == topic.title() => Ok(session),
            _ => {
                let session = QuizSession::start(topic.title());
                self.sessions.save(username, &session).await?;
                Ok(session)
            }
        }
    }

    async fn step(
        &self,
        username: &str,
        topic: Topic,
        questions: &'static [Question],
        session: QuizSession,
    ) -> Result<QuizStep> {
        let total = questions.len();

        if session.is_complete(total) {
            let result = session.score(questions);

            let attempt =
                AptitudeAttempt::new(username, topic.title(), result.score, result.total);
            self.attempts.insert_aptitude_attempt(&attempt).await?;
            self.sessions.clear(username).await?;

            QUIZZES_COMPLETED_TOTAL
                .with_label_values(&[topic.title()])
                .inc();
            tracing::info!(
                "Quiz finished: user={}, topic={}, score={}/{} ({}%)",
                username,
                topic.title(),
                result.score,
                result.total,
                result.percent
            );

            return Ok(QuizStep::Finished {
                topic: topic.title().to_string(),
                score: result.score,
                total: result.total,
                percent: result.percent,
            });
        }

        let question = &questions[session.index];
        Ok(QuizStep::InProgress {
            topic: topic.title().to_string(),
            question: QuestionView::from(question),
            index: session.index,
            total,
            progress: (session.index * 100 / total) as u32,
        })
    }
}

fn resolve_topic(slug: &str) -> Result<(Topic, &'static [Question]), QuizError> {
    let topic = Topic::from_slug(slug).ok_or_else(|| QuizError::UnknownTopic(slug.to_string()))?;
    let questions = questions_for(topic);
    if questions.is_empty() {
        return Err(QuizError::UnknownTopic(slug.to_string()));
    }
    Ok((topic, questions))
}
