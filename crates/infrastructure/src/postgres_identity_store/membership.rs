use super::*;

impl PostgresIdentityStore {
    pub(super) async fn list_role_names_impl(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(internal("list roles"))
    }

    pub(super) async fn get_roles_impl(&self, user_id: UserId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT role_name FROM user_roles WHERE user_id = $1 ORDER BY role_name",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list user roles"))
    }

    pub(super) async fn add_to_roles_impl(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        let mut transaction = self.pool.begin().await.map_err(internal("begin transaction"))?;

        let known = sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE name = ANY($1)")
            .bind(roles)
            .fetch_all(&mut *transaction)
            .await
            .map_err(internal("resolve roles"))?;
        let current = sqlx::query_scalar::<_, String>(
            "SELECT role_name FROM user_roles WHERE user_id = $1 AND role_name = ANY($2)",
        )
        .bind(user_id.as_uuid())
        .bind(roles)
        .fetch_all(&mut *transaction)
        .await
        .map_err(internal("resolve user roles"))?;

        let errors: Vec<String> = roles
            .iter()
            .filter(|role| !known.contains(role))
            .map(|role| format!("Role '{role}' does not exist."))
            .chain(
                current
                    .iter()
                    .map(|role| format!("User already in role '{role}'.")),
            )
            .collect();
        if !errors.is_empty() {
            return Ok(IdentityResult::Failed(errors));
        }

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_name)
            SELECT $1, role_name FROM UNNEST($2::TEXT[]) AS role_name
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(roles)
        .execute(&mut *transaction)
        .await
        .map_err(internal("add user roles"))?;

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))?;

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn remove_from_roles_impl(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        let removed = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_name = ANY($2)
            RETURNING role_name
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(roles)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("remove user roles"))?;

        let errors: Vec<String> = roles
            .iter()
            .filter(|role| !removed.contains(role))
            .map(|role| format!("User is not in role '{role}'."))
            .collect();
        if !errors.is_empty() {
            return Ok(IdentityResult::Failed(errors));
        }

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn get_claims_impl(&self, user_id: UserId) -> AppResult<Vec<Claim>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT claim_type, claim_value
            FROM user_claims
            WHERE user_id = $1
            ORDER BY claim_type, claim_value
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list user claims"))?;

        Ok(rows
            .into_iter()
            .map(|(claim_type, value)| Claim::new(claim_type, value))
            .collect())
    }

    pub(super) async fn add_claim_impl(
        &self,
        user_id: UserId,
        claim: &Claim,
    ) -> AppResult<IdentityResult> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_claims (user_id, claim_type, claim_value)
            SELECT id, $2, $3 FROM user_accounts WHERE id = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(claim.claim_type())
        .bind(claim.value())
        .execute(&self.pool)
        .await
        .map_err(internal("add user claim"))?;

        if result.rows_affected() == 0 {
            return Ok(IdentityResult::failed(format!(
                "Claim '{}' is already assigned or the user does not exist.",
                claim.value()
            )));
        }

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn remove_claim_impl(
        &self,
        user_id: UserId,
        claim: &Claim,
    ) -> AppResult<IdentityResult> {
        sqlx::query(
            r#"
            DELETE FROM user_claims
            WHERE user_id = $1 AND claim_type = $2 AND claim_value = $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(claim.claim_type())
        .bind(claim.value())
        .execute(&self.pool)
        .await
        .map_err(internal("remove user claim"))?;

        Ok(IdentityResult::Succeeded(()))
    }
}
