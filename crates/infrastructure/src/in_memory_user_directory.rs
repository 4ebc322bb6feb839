//! Process-wide snapshot of accounts for superior pickers.

use std::sync::Arc;

use async_trait::async_trait;
use steward_application::{IdentityStore, UserDirectory, UserDirectoryEntry, UserFilter};
use steward_core::AppResult;
use tokio::sync::RwLock;
use tracing::debug;

/// User directory rebuilt from the identity store on every refresh.
pub struct InMemoryUserDirectory {
    identity_store: Arc<dyn IdentityStore>,
    entries: RwLock<Option<Vec<UserDirectoryEntry>>>,
}

impl InMemoryUserDirectory {
    /// Creates a directory that loads lazily on first read.
    #[must_use]
    pub fn new(identity_store: Arc<dyn IdentityStore>) -> Self {
        Self {
            identity_store,
            entries: RwLock::new(None),
        }
    }

    async fn load(&self) -> AppResult<Vec<UserDirectoryEntry>> {
        let accounts = self
            .identity_store
            .list_users(&UserFilter::default())
            .await?;

        Ok(accounts
            .into_iter()
            .map(|account| UserDirectoryEntry {
                id: account.id,
                display_name: account.label().to_owned(),
                user_name: account.user_name,
                is_active: account.is_active,
            })
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn refresh(&self) -> AppResult<()> {
        let entries = self.load().await?;
        debug!(entries = entries.len(), "user directory refreshed");
        *self.entries.write().await = Some(entries);
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<UserDirectoryEntry>> {
        if let Some(entries) = self.entries.read().await.as_ref() {
            return Ok(entries.clone());
        }

        self.refresh().await?;
        Ok(self.entries.read().await.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use steward_application::{IdentityStore, NewUserAccount, PasswordHasher, UserDirectory};
    use steward_core::AppResult;

    use super::InMemoryUserDirectory;
    use crate::InMemoryIdentityStore;

    struct NoopPasswordHasher;

    impl PasswordHasher for NoopPasswordHasher {
        fn hash_password(&self, password: &str) -> AppResult<String> {
            Ok(password.to_owned())
        }

        fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
            Ok(password == hash)
        }
    }

    fn account(user_name: &str, display_name: Option<&str>) -> NewUserAccount {
        NewUserAccount {
            user_name: user_name.to_owned(),
            display_name: display_name.map(str::to_owned),
            email: None,
            phone_number: None,
            profile_picture_url: None,
            tenant_id: None,
            tenant_name: None,
            superior_id: None,
            provider: "Local".to_owned(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn snapshot_changes_only_on_refresh() {
        let store = Arc::new(InMemoryIdentityStore::new(Arc::new(NoopPasswordHasher)));
        let directory = InMemoryUserDirectory::new(store.clone());
        assert!(store.create_user(account("amy", Some("Amy Pond")), None).await.is_ok());

        let first = directory.entries().await.unwrap_or_default();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].display_name, "Amy Pond");

        assert!(store.create_user(account("rory", None), None).await.is_ok());
        assert_eq!(directory.entries().await.unwrap_or_default().len(), 1);

        assert!(directory.refresh().await.is_ok());
        let refreshed = directory.entries().await.unwrap_or_default();
        assert_eq!(refreshed.len(), 2);
        assert_eq!(refreshed[1].display_name, "rory");
    }
}
