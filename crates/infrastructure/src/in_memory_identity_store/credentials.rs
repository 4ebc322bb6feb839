use crate::reset_token::{generate_reset_token, hash_reset_token};

use super::*;

impl InMemoryIdentityStore {
    pub(super) async fn generate_password_reset_token_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<String> {
        let (raw_token, digest) = generate_reset_token()?;

        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&user_id) {
            return Err(steward_core::AppError::NotFound(format!(
                "the application user [{user_id}] was not found"
            )));
        }
        state.reset_tokens.insert(user_id, digest);

        Ok(raw_token)
    }

    pub(super) async fn reset_password_impl(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> AppResult<IdentityResult> {
        let password_hash = self.password_hasher.hash_password(new_password)?;

        let mut state = self.state.write().await;
        let issued = state.reset_tokens.remove(&user_id);
        if issued.as_deref() != Some(hash_reset_token(token).as_str()) {
            return Ok(IdentityResult::failed("Invalid token."));
        }

        let Some(stored) = state.accounts.get_mut(&user_id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        };
        stored.password_hash = Some(password_hash);

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn check_password_impl(
        &self,
        user_id: UserId,
        password: &str,
    ) -> AppResult<bool> {
        let password_hash = self
            .state
            .read()
            .await
            .accounts
            .get(&user_id)
            .and_then(|stored| stored.password_hash.clone());

        match password_hash {
            Some(password_hash) => self
                .password_hasher
                .verify_password(password, &password_hash),
            None => Ok(false),
        }
    }
}
