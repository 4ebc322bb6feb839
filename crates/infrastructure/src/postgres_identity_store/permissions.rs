use steward_domain::{ADMIN_ROLE_NAME, BASIC_ROLE_NAME, PERMISSION_CLAIM_TYPE};
use tracing::{info, warn};

use super::*;

impl PostgresIdentityStore {
    /// Creates the system roles and grants `Admin` every catalog permission.
    ///
    /// Safe to run on every start; existing rows are left in place.
    pub async fn seed_system_roles(&self) -> AppResult<()> {
        let permissions: Vec<&str> = Permission::all().map(|permission| permission.as_str()).collect();
        let mut transaction = self.pool.begin().await.map_err(internal("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO roles (name, is_system)
            VALUES ($1, TRUE), ($2, TRUE)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(ADMIN_ROLE_NAME)
        .bind(BASIC_ROLE_NAME)
        .execute(&mut *transaction)
        .await
        .map_err(internal("seed system roles"))?;

        let granted = sqlx::query(
            r#"
            INSERT INTO role_claims (role_name, claim_type, claim_value)
            SELECT $1, $2, claim_value FROM UNNEST($3::TEXT[]) AS claim_value
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(ADMIN_ROLE_NAME)
        .bind(PERMISSION_CLAIM_TYPE)
        .bind(permissions)
        .execute(&mut *transaction)
        .await
        .map_err(internal("seed administrator permissions"))?;

        transaction
            .commit()
            .await
            .map_err(internal("commit transaction"))?;

        if granted.rows_affected() > 0 {
            info!(
                granted = granted.rows_affected(),
                "granted catalog permissions to the administrator role"
            );
        }

        Ok(())
    }

    pub(super) async fn list_permissions_for_subject_impl(
        &self,
        subject: &str,
    ) -> AppResult<Vec<Permission>> {
        let Ok(user_id) = UserId::parse(subject) else {
            return Ok(Vec::new());
        };

        let values = sqlx::query_scalar::<_, String>(
            r#"
            SELECT claim_value
            FROM user_claims
            WHERE user_id = $1 AND claim_type = $2
            UNION
            SELECT rc.claim_value
            FROM user_roles ur
            JOIN role_claims rc ON rc.role_name = ur.role_name
            WHERE ur.user_id = $1 AND rc.claim_type = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(PERMISSION_CLAIM_TYPE)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list subject permissions"))?;

        let mut permissions: Vec<Permission> = values
            .iter()
            .filter_map(|value| match value.parse::<Permission>() {
                Ok(permission) => Some(permission),
                Err(_) => {
                    warn!(subject, value = %value, "ignoring unknown permission claim");
                    None
                }
            })
            .collect();
        permissions.sort();

        Ok(permissions)
    }
}
