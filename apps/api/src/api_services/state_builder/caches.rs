use std::sync::Arc;

use steward_application::ClaimCache;
use steward_core::{AppError, AppResult};
use steward_infrastructure::{InMemoryClaimCache, RedisClaimCache};

use crate::api_config::{ApiConfig, CacheBackend};

const CLAIM_CACHE_KEY_PREFIX: &str = "steward:claims";

pub(super) fn build_claim_cache(config: &ApiConfig) -> AppResult<Arc<dyn ClaimCache>> {
    match &config.cache_backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryClaimCache::new())),
        CacheBackend::Redis { redis_url } => {
            let client = redis::Client::open(redis_url.as_str())
                .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
            Ok(Arc::new(RedisClaimCache::new(client, CLAIM_CACHE_KEY_PREFIX)))
        }
    }
}
