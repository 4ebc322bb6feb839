use std::sync::Arc;

use async_trait::async_trait;
use steward_core::{AppError, AppResult, UserIdentity};
use steward_domain::Permission;

mod capabilities;

#[cfg(test)]
mod tests;

pub use capabilities::UserCapabilities;

/// Repository port for permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists effective permissions for a subject: its own permission claims
    /// plus the permission claims of every role it holds.
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>>;
}

/// Application service for principal authorization checks.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Ensures the principal holds the required permission.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<()> {
        if self.has_permission(actor, permission).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}'",
            actor.subject(),
            permission.as_str()
        )))
    }

    /// Returns whether the principal currently holds the permission.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<bool> {
        let permissions = self
            .repository
            .list_permissions_for_subject(actor.subject())
            .await?;

        Ok(permissions.contains(&permission))
    }
}
