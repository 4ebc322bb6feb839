use async_trait::async_trait;
use steward_application::{AuditEvent, AuditRepository};
use steward_core::AppResult;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory audit repository keeping events for the process lifetime.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded event in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            subject = %event.subject,
            action = event.action.as_str(),
            resource_id = %event.resource_id,
            "audit event recorded"
        );
        self.events.write().await.push(event);
        Ok(())
    }
}
