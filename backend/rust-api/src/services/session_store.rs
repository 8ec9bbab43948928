use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;

use crate::metrics::track_cache_operation;
use crate::models::QuizSession;

/// Transient storage for in-flight quiz sessions, keyed by username.
/// One session per user; no identity beyond the owning browsing
/// session.
#[async_trait]
pub trait QuizSessionStore: Send + Sync {
    async fn load(&self, username: &str) -> Result<Option<QuizSession>>;
    async fn save(&self, username: &str, session: &QuizSession) -> Result<()>;
    async fn clear(&self, username: &str) -> Result<()>;
    async fn ping(&self) -> Result<()>;
}

// Sessions are short-lived; anything older than 2h is abandoned.
const SESSION_TTL_SECONDS: u64 = 7200;

pub struct RedisQuizSessionStore {
    redis: ConnectionManager,
}

impl RedisQuizSessionStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    fn key(username: &str) -> String {
        format!("quiz:{}", username)
    }
}

#[async_trait]
impl QuizSessionStore for RedisQuizSessionStore {
    async fn load(&self, username: &str) -> Result<Option<QuizSession>> {
        let mut conn = self.redis.clone();
        let key = Self::key(username);

        let json: Option<String> = track_cache_operation("get", async {
            redis::cmd("GET")
                .arg(&key)
                .query_async(&mut conn)
                .await
                .context("Failed to load quiz session from Redis")
        })
        .await?;

        match json {
            Some(json) => {
                let session =
                    serde_json::from_str(&json).context("Failed to deserialize quiz session")?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, username: &str, session: &QuizSession) -> Result<()> {
        let mut conn = self.redis.clone();
        let key = Self::key(username);
        let json = serde_json::to_string(session).context("Failed to serialize quiz session")?;

        track_cache_operation("setex", async {
            redis::cmd("SETEX")
                .arg(&key)
                .arg(SESSION_TTL_SECONDS)
                .arg(json)
                .query_async::<()>(&mut conn)
                .await
                .context("Failed to save quiz session to Redis")
        })
        .await
    }

    async fn clear(&self, username: &str) -> Result<()> {
        let mut conn = self.redis.clone();
        let key = Self::key(username);

        track_cache_operation("del", async {
            redis::cmd("DEL")
                .arg(&key)
                .query_async::<()>(&mut conn)
                .await
                .context("Failed to clear quiz session from Redis")
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .context("Redis ping failed")?;
        Ok(())
    }
}
