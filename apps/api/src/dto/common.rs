use serde::Serialize;
use steward_core::UserIdentity;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "health-response.ts")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Identity store backend serving requests, `memory` or `postgres`.
    pub store: &'static str,
}

/// Notice shown after an operation that returns no data.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "generic-message-response.ts")]
pub struct GenericMessageResponse {
    pub message: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-identity-response.ts")]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub tenant_id: Option<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            tenant_id: identity.tenant_id().map(|tenant_id| tenant_id.to_string()),
        }
    }
}
