#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use prepmate_api::middlewares::auth::{JwtClaims, JwtService};
use prepmate_api::models::{
    AptitudeAttempt, CodingAttempt, Difficulty, DifficultyAggregate, PracticeProblem, QuizSession,
    TopicAggregate, UserSummary,
};
use prepmate_api::services::attempt_store::{
    aggregate_aptitude, aggregate_coding, summarize_user, AttemptStore,
};
use prepmate_api::services::practice_service::ProblemBank;
use prepmate_api::services::session_store::QuizSessionStore;
use prepmate_api::{create_router, AppState, Config};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Attempt store double backed by plain vectors; aggregates reuse the
/// same fold helpers as the Mongo store.
#[derive(Default)]
pub struct InMemoryAttemptStore {
    aptitude: Mutex<Vec<AptitudeAttempt>>,
    coding: Mutex<Vec<CodingAttempt>>,
}

impl InMemoryAttemptStore {
    pub fn aptitude_attempts(&self) -> Vec<AptitudeAttempt> {
        self.aptitude.lock().unwrap().clone()
    }

    pub fn coding_attempts(&self) -> Vec<CodingAttempt> {
        self.coding.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn insert_aptitude_attempt(&self, attempt: &AptitudeAttempt) -> Result<()> {
        self.aptitude.lock().unwrap().push(attempt.clone());
        Ok(())
    }

    async fn insert_coding_attempt(&self, attempt: &CodingAttempt) -> Result<()> {
        self.coding.lock().unwrap().push(attempt.clone());
        Ok(())
    }

    async fn aptitude_aggregates(&self, username: Option<&str>) -> Result<Vec<TopicAggregate>> {
        let attempts: Vec<AptitudeAttempt> = self
            .aptitude
            .lock()
            .unwrap()
            .iter()
            .filter(|a| username.is_none_or(|u| a.username == u))
            .cloned()
            .collect();
        Ok(aggregate_aptitude(&attempts))
    }

    async fn user_summary(&self, username: &str) -> Result<Option<UserSummary>> {
        let attempts: Vec<AptitudeAttempt> = self
            .aptitude
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.username == username)
            .cloned()
            .collect();
        Ok(summarize_user(&attempts))
    }

    async fn coding_aggregates(
        &self,
        username: &str,
        topic: &str,
    ) -> Result<Vec<DifficultyAggregate>> {
        let attempts: Vec<CodingAttempt> = self
            .coding
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.username == username && a.topic == topic)
            .cloned()
            .collect();
        Ok(aggregate_coding(&attempts))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizSessionStore {
    sessions: Mutex<HashMap<String, QuizSession>>,
}

impl InMemoryQuizSessionStore {
    pub fn session_for(&self, username: &str) -> Option<QuizSession> {
        self.sessions.lock().unwrap().get(username).cloned()
    }
}

#[async_trait]
impl QuizSessionStore for InMemoryQuizSessionStore {
    async fn load(&self, username: &str) -> Result<Option<QuizSession>> {
        Ok(self.sessions.lock().unwrap().get(username).cloned())
    }

    async fn save(&self, username: &str, session: &QuizSession) -> Result<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(username.to_string(), session.clone());
        Ok(())
    }

    async fn clear(&self, username: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(username);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub attempts: Arc<InMemoryAttemptStore>,
    pub sessions: Arc<InMemoryQuizSessionStore>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_problems(default_problems())
}

pub fn create_test_app_with_problems(problems: Vec<PracticeProblem>) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        mongo_uri: "mongodb://unused".to_string(),
        redis_uri: "redis://unused".to_string(),
        mongo_database: "prepmate-test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        problems_path: PathBuf::from("data/problems.json"),
    };

    let attempts = Arc::new(InMemoryAttemptStore::default());
    let sessions = Arc::new(InMemoryQuizSessionStore::default());

    let state = AppState::with_stores(
        config,
        attempts.clone(),
        sessions.clone(),
        ProblemBank::from_problems(problems),
    );

    TestApp {
        app: create_router(Arc::new(state)),
        attempts,
        sessions,
    }
}

fn default_problems() -> Vec<PracticeProblem> {
    vec![
        PracticeProblem {
            title: "Two Sum".to_string(),
            title_slug: "two-sum".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string(), "hash-table".to_string()],
        },
        PracticeProblem {
            title: "Course Schedule".to_string(),
            title_slug: "course-schedule".to_string(),
            difficulty: Difficulty::Medium,
            tags: vec!["graph".to_string(), "topological-sort".to_string()],
        },
        PracticeProblem {
            title: "Trapping Rain Water".to_string(),
            title_slug: "trapping-rain-water".to_string(),
            difficulty: Difficulty::Hard,
            tags: vec!["array".to_string(), "two-pointers".to_string()],
        },
    ]
}

pub fn bearer_token(username: &str) -> String {
    let service = JwtService::new(TEST_JWT_SECRET);
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: username.to_string(),
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    service.generate_token(claims).unwrap()
}

pub async fn get_json(
    app: &Router,
    uri: &str,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
