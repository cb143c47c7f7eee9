//! Browser session management using Redis

use anyhow::Result;
use common::cache::RedisPool;
use tracing::info;
use uuid::Uuid;

/// Name of the cookie carrying the session key
pub const SESSION_COOKIE: &str = "sessionid";

/// Session manager for handling login sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    fn key(session_key: &str) -> String {
        format!("session:{}", session_key)
    }

    /// Create a new session for a user and return its key
    pub async fn create_session(&self, user_id: i64) -> Result<String> {
        info!("Creating session for user: {}", user_id);

        let session_key = Uuid::new_v4().simple().to_string();
        self.redis_pool
            .set(
                &Self::key(&session_key),
                &user_id.to_string(),
                Some(self.ttl_seconds),
            )
            .await?;

        Ok(session_key)
    }

    /// Resolve a session key to the user it belongs to
    pub async fn get_user_id(&self, session_key: &str) -> Result<Option<i64>> {
        let value = self.redis_pool.get(&Self::key(session_key)).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Delete a session
    pub async fn delete_session(&self, session_key: &str) -> Result<()> {
        info!("Deleting session");

        self.redis_pool.delete(&Self::key(session_key)).await?;
        Ok(())
    }
}
