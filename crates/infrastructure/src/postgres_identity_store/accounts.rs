use super::*;

impl PostgresIdentityStore {
    pub(super) async fn create_user_impl(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>> {
        let password_hash = password
            .map(|password| self.password_hasher.hash_password(password))
            .transpose()?;

        let created = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO user_accounts (
                id,
                user_name,
                normalized_user_name,
                display_name,
                email,
                phone_number,
                profile_picture_url,
                tenant_id,
                tenant_name,
                superior_id,
                provider,
                is_active,
                password_hash
            )
            VALUES ($1, $2, LOWER($2), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (normalized_user_name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(&account.user_name)
        .bind(account.display_name)
        .bind(account.email)
        .bind(account.phone_number)
        .bind(account.profile_picture_url)
        .bind(account.tenant_id.map(|tenant_id| tenant_id.as_uuid()))
        .bind(account.tenant_name)
        .bind(account.superior_id.map(|superior_id| superior_id.as_uuid()))
        .bind(account.provider)
        .bind(account.is_active)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("create user account"))?;

        Ok(match created {
            Some(id) => IdentityResult::Succeeded(UserId::from_uuid(id)),
            None => IdentityResult::failed(format!(
                "User name '{}' is already taken.",
                account.user_name
            )),
        })
    }

    pub(super) async fn find_by_id_impl(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserAccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM user_accounts u WHERE u.id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("find user account"))?;

        Ok(row.map(UserAccount::from))
    }

    pub(super) async fn find_by_user_name_impl(
        &self,
        user_name: &str,
    ) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserAccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM user_accounts u WHERE u.normalized_user_name = LOWER($1)"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("find user account by name"))?;

        Ok(row.map(UserAccount::from))
    }

    pub(super) async fn update_user_impl(&self, account: &UserAccount) -> AppResult<IdentityResult> {
        let result = sqlx::query(
            r#"
            UPDATE user_accounts
            SET user_name = $2,
                normalized_user_name = LOWER($2),
                display_name = $3,
                email = $4,
                phone_number = $5,
                profile_picture_url = $6,
                tenant_id = $7,
                tenant_name = $8,
                superior_id = $9,
                provider = $10,
                is_active = $11,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.user_name)
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(&account.phone_number)
        .bind(&account.profile_picture_url)
        .bind(account.tenant_id.map(|tenant_id| tenant_id.as_uuid()))
        .bind(&account.tenant_name)
        .bind(account.superior_id.map(|superior_id| superior_id.as_uuid()))
        .bind(&account.provider)
        .bind(account.is_active)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(IdentityResult::failed(format!(
                "User '{}' does not exist.",
                account.id
            ))),
            Ok(_) => Ok(IdentityResult::Succeeded(())),
            Err(sqlx::Error::Database(database_error))
                if database_error.code().as_deref() == Some("23505") =>
            {
                Ok(IdentityResult::failed(format!(
                    "User name '{}' is already taken.",
                    account.user_name
                )))
            }
            Err(error) => Err(AppError::Internal(format!(
                "failed to update user account: {error}"
            ))),
        }
    }

    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<IdentityResult> {
        let result = sqlx::query("DELETE FROM user_accounts WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(internal("delete user account"))?;

        if result.rows_affected() == 0 {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        }

        Ok(IdentityResult::Succeeded(()))
    }
}
