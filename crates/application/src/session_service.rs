//! Password sign-in for the administration page.
//!
//! Failures are reported with one generic message regardless of cause so
//! the endpoint cannot be used to enumerate accounts.

use std::sync::Arc;

use steward_core::{AppError, AppResult, UserIdentity};
use tracing::{info, warn};

use crate::{IdentityStore, UserAccount};

const SIGN_IN_FAILED: &str = "invalid user name or password";

/// Application service resolving credentials into a session principal.
#[derive(Clone)]
pub struct SessionService {
    identity_store: Arc<dyn IdentityStore>,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(identity_store: Arc<dyn IdentityStore>) -> Self {
        Self { identity_store }
    }

    /// Verifies credentials and returns the principal to store in the session.
    ///
    /// Unknown accounts, wrong passwords, accounts without a password and
    /// inactive accounts all fail with the same `Unauthorized` error.
    pub async fn authenticate(&self, user_name: &str, password: &str) -> AppResult<UserIdentity> {
        let Some(account) = self
            .identity_store
            .find_by_user_name(user_name.trim())
            .await?
        else {
            warn!(user_name = %user_name.trim(), "sign-in rejected: unknown user name");
            return Err(AppError::Unauthorized(SIGN_IN_FAILED.to_owned()));
        };

        if !self
            .identity_store
            .check_password(account.id, password)
            .await?
        {
            warn!(user_id = %account.id, "sign-in rejected: password mismatch");
            return Err(AppError::Unauthorized(SIGN_IN_FAILED.to_owned()));
        }

        if !account.is_active {
            warn!(user_id = %account.id, "sign-in rejected: account is inactive");
            return Err(AppError::Unauthorized(SIGN_IN_FAILED.to_owned()));
        }

        info!(user_id = %account.id, "user signed in");
        Ok(identity_for(&account))
    }
}

/// Builds the session principal of an account.
#[must_use]
pub fn identity_for(account: &UserAccount) -> UserIdentity {
    UserIdentity::new(
        account.id.to_string(),
        account.label(),
        account.email.clone(),
        account.tenant_id,
    )
}
