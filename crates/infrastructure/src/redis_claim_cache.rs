//! Redis-backed claim cache.

use async_trait::async_trait;
use redis::AsyncCommands;
use steward_application::ClaimCache;
use steward_core::{AppError, AppResult};
use steward_domain::Claim;

/// Redis implementation of the claim cache port.
///
/// Entries are JSON arrays stored with `SET EX`, so Redis enforces the ttl.
#[derive(Clone)]
pub struct RedisClaimCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisClaimCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl ClaimCache for RedisClaimCache {
    async fn get_claims(&self, key: &str) -> AppResult<Option<Vec<Claim>>> {
        let mut connection = self.connection().await?;

        let encoded: Option<String> =
            connection.get(self.key_for(key)).await.map_err(|error| {
                AppError::Internal(format!("failed to read claim cache entry: {error}"))
            })?;

        encoded
            .as_deref()
            .map(|value| {
                serde_json::from_str(value).map_err(|error| {
                    AppError::Internal(format!("invalid claim cache entry for '{key}': {error}"))
                })
            })
            .transpose()
    }

    async fn set_claims(&self, key: &str, claims: Vec<Claim>, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let value = serde_json::to_string(&claims).map_err(|error| {
            AppError::Internal(format!("failed to encode claim cache entry: {error}"))
        })?;
        let mut connection = self.connection().await?;

        connection
            .set_ex(self.key_for(key), value, u64::from(ttl_seconds))
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to write claim cache entry: {error}"))
            })
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;

        connection
            .del(self.key_for(key))
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to remove claim cache entry: {error}"))
            })
    }
}
