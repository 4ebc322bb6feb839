use async_trait::async_trait;
use steward_core::AppResult;
use steward_domain::UserId;

/// Lightweight account projection used by superior pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDirectoryEntry {
    /// Account id.
    pub id: UserId,
    /// Login name.
    pub user_name: String,
    /// Display name, falling back to the login name.
    pub display_name: String,
    /// Whether the account can sign in.
    pub is_active: bool,
}

/// Shared snapshot of all accounts, rebuilt after every account mutation.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Rebuilds the snapshot from the identity store.
    async fn refresh(&self) -> AppResult<()>;

    /// Returns the current snapshot.
    async fn entries(&self) -> AppResult<Vec<UserDirectoryEntry>>;
}
