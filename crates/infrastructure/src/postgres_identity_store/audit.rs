use super::*;

impl PostgresIdentityStore {
    pub(super) async fn append_event_impl(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log_entries (
                tenant_id, subject, action, resource_type, resource_id, detail
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.tenant_id.map(|tenant_id| tenant_id.as_uuid()))
        .bind(event.subject)
        .bind(event.action.as_str())
        .bind(event.resource_type)
        .bind(event.resource_id)
        .bind(event.detail)
        .execute(&self.pool)
        .await
        .map_err(internal("append audit event"))?;

        Ok(())
    }
}
