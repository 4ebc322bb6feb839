use crate::reset_token::{RESET_TOKEN_TTL_SECONDS, generate_reset_token, hash_reset_token};

use super::*;

impl PostgresIdentityStore {
    pub(super) async fn generate_password_reset_token_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<String> {
        let (raw_token, digest) = generate_reset_token()?;
        let expires_at = chrono::Utc::now() + chrono::Duration::seconds(RESET_TOKEN_TTL_SECONDS);

        let result = sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
            SELECT id, $2, $3 FROM user_accounts WHERE id = $1
            ON CONFLICT (user_id)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(digest)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(internal("issue password reset token"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "the application user [{user_id}] was not found"
            )));
        }

        Ok(raw_token)
    }

    pub(super) async fn reset_password_impl(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> AppResult<IdentityResult> {
        let password_hash = self.password_hasher.hash_password(new_password)?;
        let mut transaction = self.pool.begin().await.map_err(internal("begin transaction"))?;

        let redeemed = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            DELETE FROM password_reset_tokens
            WHERE user_id = $1 AND token_hash = $2 AND expires_at > now()
            RETURNING user_id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(hash_reset_token(token))
        .fetch_optional(&mut *transaction)
        .await
        .map_err(internal("redeem password reset token"))?;

        if redeemed.is_none() {
            return Ok(IdentityResult::failed("Invalid token."));
        }

        sqlx::query(
            r#"
            UPDATE user_accounts
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&mut *transaction)
        .await
        .map_err(internal("store password hash"))?;

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))?;

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn check_password_impl(
        &self,
        user_id: UserId,
        password: &str,
    ) -> AppResult<bool> {
        let password_hash = sqlx::query_scalar::<_, Option<String>>(
            "SELECT password_hash FROM user_accounts WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("load password hash"))?
        .flatten();

        match password_hash {
            Some(password_hash) => self
                .password_hasher
                .verify_password(password, &password_hash),
            None => Ok(false),
        }
    }
}
