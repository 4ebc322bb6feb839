use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use steward_application::ClaimCache;
use steward_core::AppResult;
use steward_domain::Claim;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ClaimCacheEntry {
    claims: Vec<Claim>,
    expires_at: Instant,
}

/// In-memory claim cache with absolute, lazily enforced expiry.
#[derive(Debug, Default)]
pub struct InMemoryClaimCache {
    entries: RwLock<HashMap<String, ClaimCacheEntry>>,
}

impl InMemoryClaimCache {
    /// Creates an empty in-memory claim cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimCache for InMemoryClaimCache {
    async fn get_claims(&self, key: &str) -> AppResult<Option<Vec<Claim>>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.claims.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set_claims(&self, key: &str, claims: Vec<Claim>, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(u64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key.to_owned(), ClaimCacheEntry { claims, expires_at });

        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use steward_application::ClaimCache;
    use steward_domain::{Claim, Permission};

    use super::{ClaimCacheEntry, InMemoryClaimCache};

    #[tokio::test]
    async fn stored_claims_are_returned_until_removed() {
        let cache = InMemoryClaimCache::new();
        let claims = vec![Claim::permission(Permission::UsersView)];

        let stored = cache.set_claims("get-claims-by-1", claims.clone(), 60).await;
        assert!(stored.is_ok());
        assert!(matches!(cache.get_claims("get-claims-by-1").await, Ok(Some(ref cached)) if *cached == claims));

        assert!(cache.remove("get-claims-by-1").await.is_ok());
        assert!(matches!(cache.get_claims("get-claims-by-1").await, Ok(None)));
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = InMemoryClaimCache::new();

        let stored = cache.set_claims("key", Vec::new(), 0).await;

        assert!(stored.is_ok());
        assert!(matches!(cache.get_claims("key").await, Ok(None)));
    }

    #[tokio::test]
    async fn expired_entries_are_dropped_on_read() {
        let cache = InMemoryClaimCache::new();
        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        cache.entries.write().await.insert(
            "key".to_owned(),
            ClaimCacheEntry {
                claims: Vec::new(),
                expires_at: past,
            },
        );

        assert!(matches!(cache.get_claims("key").await, Ok(None)));
        assert!(cache.entries.read().await.is_empty());
    }
}
