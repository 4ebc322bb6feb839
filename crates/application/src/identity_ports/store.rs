use async_trait::async_trait;
use steward_core::{AppError, AppResult};
use steward_domain::{Claim, UserId};

use super::{NewUserAccount, PageRequest, UserAccount, UserFilter};

/// Outcome of an identity store write.
///
/// Store-level validation failures (duplicate user name, unknown role,
/// rejected password) are reported as human-readable messages instead of
/// errors so callers can show all of them at once. Infrastructure failures
/// still travel as [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum IdentityResult<T = ()> {
    /// The write was applied.
    Succeeded(T),
    /// The write was rejected; nothing was applied.
    Failed(Vec<String>),
}

impl<T> IdentityResult<T> {
    /// Creates a failed result with one message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(vec![message.into()])
    }

    /// Returns whether the write was applied.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Converts the outcome into an [`AppResult`], joining messages with `,`.
    pub fn into_app_result(self) -> AppResult<T> {
        match self {
            Self::Succeeded(value) => Ok(value),
            Self::Failed(errors) => Err(AppError::Validation(errors.join(","))),
        }
    }
}

/// Port over the identity store holding accounts, roles and claims.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Creates an account, hashing `password` when one is supplied.
    async fn create_user(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>>;

    /// Finds an account by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Finds an account by user name (case-insensitive).
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>>;

    /// Persists every mutable field of `account`. Role memberships are ignored.
    async fn update_user(&self, account: &UserAccount) -> AppResult<IdentityResult>;

    /// Deletes an account together with its roles and claims.
    async fn delete_user(&self, user_id: UserId) -> AppResult<IdentityResult>;

    /// Returns one sorted page of accounts matching `filter`.
    async fn query_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Vec<UserAccount>>;

    /// Counts accounts matching `filter`.
    async fn count_users(&self, filter: &UserFilter) -> AppResult<u64>;

    /// Returns every account matching `filter`, sorted by user name.
    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<UserAccount>>;

    /// Lists every role name, sorted.
    async fn list_role_names(&self) -> AppResult<Vec<String>>;

    /// Lists the roles of an account.
    async fn get_roles(&self, user_id: UserId) -> AppResult<Vec<String>>;

    /// Adds the account to every listed role.
    async fn add_to_roles(&self, user_id: UserId, roles: &[String]) -> AppResult<IdentityResult>;

    /// Removes the account from every listed role.
    async fn remove_from_roles(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult>;

    /// Lists the claims attached directly to an account.
    async fn get_claims(&self, user_id: UserId) -> AppResult<Vec<Claim>>;

    /// Attaches a claim to an account.
    async fn add_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult>;

    /// Detaches a claim from an account.
    async fn remove_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult>;

    /// Issues a single-use password reset token.
    async fn generate_password_reset_token(&self, user_id: UserId) -> AppResult<String>;

    /// Redeems a reset token and stores the hash of `new_password`.
    async fn reset_password(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> AppResult<IdentityResult>;

    /// Verifies a password against the stored hash. Accounts without a
    /// password never verify.
    async fn check_password(&self, user_id: UserId, password: &str) -> AppResult<bool>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
