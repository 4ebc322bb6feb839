use async_trait::async_trait;
use steward_core::{AppResult, TenantId};

/// Tenant projection used for pickers and import resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSummary {
    /// Tenant identifier.
    pub id: TenantId,
    /// Unique tenant name.
    pub name: String,
}

/// Source of known tenants.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Lists every tenant in a stable order (creation order).
    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>>;

    /// Returns the tenant named `name`, creating it when missing.
    async fn ensure_tenant(&self, name: &str) -> AppResult<TenantSummary>;
}
