use super::*;

impl PostgresIdentityStore {
    pub(super) async fn list_tenants_impl(&self) -> AppResult<Vec<TenantSummary>> {
        let rows = sqlx::query_as::<_, (uuid::Uuid, String)>(
            "SELECT id, name FROM tenants ORDER BY created_at, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(internal("list tenants"))?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| TenantSummary {
                id: TenantId::from_uuid(id),
                name,
            })
            .collect())
    }

    pub(super) async fn ensure_tenant_impl(&self, name: &str) -> AppResult<TenantSummary> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(TenantId::new().as_uuid())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(internal("create tenant"))?;

        let id = sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM tenants WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(internal("load tenant"))?;

        Ok(TenantSummary {
            id: TenantId::from_uuid(id),
            name: name.to_owned(),
        })
    }
}
