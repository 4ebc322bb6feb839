use async_trait::async_trait;
use steward_core::AppResult;
use steward_domain::{Claim, UserId};

/// Lifetime of cached claim lists unless configured otherwise.
pub const DEFAULT_CLAIM_CACHE_TTL_SECONDS: u32 = 60;

/// Returns the cache key holding the claim list of `user_id`.
#[must_use]
pub fn claims_cache_key(user_id: UserId) -> String {
    format!("get-claims-by-{user_id}")
}

/// Cache port for per-user claim lists.
///
/// Entries expire lazily: an expired entry is treated as missing on the next
/// read. Writers remove entries explicitly instead of refreshing them.
#[async_trait]
pub trait ClaimCache: Send + Sync {
    /// Returns the cached claims for `key`, if present and not expired.
    async fn get_claims(&self, key: &str) -> AppResult<Option<Vec<Claim>>>;

    /// Stores claims for `key` with an absolute ttl. A zero ttl stores nothing.
    async fn set_claims(&self, key: &str, claims: Vec<Claim>, ttl_seconds: u32) -> AppResult<()>;

    /// Removes the entry for `key`.
    async fn remove(&self, key: &str) -> AppResult<()>;
}
