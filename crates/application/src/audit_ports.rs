use async_trait::async_trait;
use steward_core::{AppResult, TenantId, UserIdentity};
use steward_domain::AuditAction;

/// Append-only audit event emitted by administrative use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Tenant of the acting principal.
    pub tenant_id: Option<TenantId>,
    /// Subject that performed the action.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

impl AuditEvent {
    /// Creates an event on a user account resource performed by `actor`.
    #[must_use]
    pub fn for_user(
        actor: &UserIdentity,
        action: AuditAction,
        resource_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: actor.tenant_id(),
            subject: actor.subject().to_owned(),
            action,
            resource_type: "user_account".to_owned(),
            resource_id: resource_id.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends a single audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
