use std::sync::Arc;

use mongodb::Client as MongoClient;
use redis::aio::ConnectionManager;

use crate::config::Config;

pub mod attempt_store;
pub mod difficulty_service;
pub mod practice_service;
pub mod prediction_service;
pub mod quiz_service;
pub mod session_store;
pub mod topic_service;

use attempt_store::{AttemptStore, MongoAttemptStore};
use difficulty_service::DifficultyRecommender;
use practice_service::ProblemBank;
use prediction_service::PerformancePredictor;
use quiz_service::QuizService;
use session_store::{QuizSessionStore, RedisQuizSessionStore};
use topic_service::TopicRecommender;

/// Process-wide state: the two store handles plus the engine service
/// objects, constructed once at startup with the stores injected.
pub struct AppState {
    pub config: Config,
    pub attempts: Arc<dyn AttemptStore>,
    pub sessions: Arc<dyn QuizSessionStore>,
    pub problems: ProblemBank,
    pub quiz: QuizService,
    pub predictor: PerformancePredictor,
    pub difficulty: DifficultyRecommender,
    pub topics: TopicRecommender,
}

impl AppState {
    pub async fn new(
        config: Config,
        mongo_client: MongoClient,
        redis_client: redis::Client,
    ) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        tracing::info!("Attempting to connect to Redis...");

        let redis = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            ConnectionManager::new(redis_client),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

        // Test connection
        let mut conn = redis.clone();
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis PING timeout after 5s"))??;

        tracing::info!("Redis connection established successfully");

        let attempts: Arc<dyn AttemptStore> = Arc::new(MongoAttemptStore::new(mongo));
        let sessions: Arc<dyn QuizSessionStore> = Arc::new(RedisQuizSessionStore::new(redis));

        let problems = match ProblemBank::load(&config.problems_path) {
            Ok(bank) => bank,
            Err(e) => {
                tracing::warn!(
                    "Problem bank unavailable ({:#}); practice lookups will find nothing",
                    e
                );
                ProblemBank::default()
            }
        };

        Ok(Self::with_stores(config, attempts, sessions, problems))
    }

    /// Wires the service objects around already-built stores. Tests use
    /// this directly with in-memory store implementations.
    pub fn with_stores(
        config: Config,
        attempts: Arc<dyn AttemptStore>,
        sessions: Arc<dyn QuizSessionStore>,
        problems: ProblemBank,
    ) -> Self {
        let quiz = QuizService::new(attempts.clone(), sessions.clone());
        let predictor = PerformancePredictor::new(attempts.clone());
        let difficulty = DifficultyRecommender::new(attempts.clone());
        let topics = TopicRecommender::new(attempts.clone());

        Self {
            config,
            attempts,
            sessions,
            problems,
            quiz,
            predictor,
            difficulty,
            topics,
        }
    }
}
