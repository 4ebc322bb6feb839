use serde::{Deserialize, Serialize};
use steward_application::{
    BulkToggleOutcome, PermissionAssignment, PermissionPanel, PermissionToggle,
};
use steward_core::AppResult;
use steward_domain::Permission;
use ts_rs::TS;

/// One permission row and the state the panel currently shows for it.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "permission-toggle-request.ts")]
pub struct PermissionToggleRequest {
    pub permission: String,
    pub assigned: bool,
}

impl PermissionToggleRequest {
    /// Parses the claim value into a catalog permission.
    pub fn to_toggle(&self) -> AppResult<PermissionToggle> {
        Ok(PermissionToggle {
            permission: self.permission.parse::<Permission>()?,
            assigned: self.assigned,
        })
    }
}

/// Requested state of every submitted row.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "assign-permissions-request.ts")]
pub struct AssignPermissionsRequest {
    pub permissions: Vec<PermissionToggleRequest>,
}

/// One row of the permission panel.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "permission-assignment-response.ts")]
pub struct PermissionAssignmentResponse {
    pub group: String,
    pub description: String,
    pub claim_type: String,
    pub claim_value: String,
    pub assigned: bool,
}

/// Permission panel of one account.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "permission-panel-response.ts")]
pub struct PermissionPanelResponse {
    pub user_id: String,
    pub user_label: String,
    pub permissions: Vec<PermissionAssignmentResponse>,
}

/// Row state after a single toggle.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "permission-toggle-response.ts")]
pub struct PermissionToggleResponse {
    pub permission: String,
    pub assigned: bool,
}

/// Counts of a bulk assignment.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bulk-permission-result-response.ts")]
pub struct BulkPermissionResultResponse {
    #[ts(type = "number")]
    pub granted: usize,
    #[ts(type = "number")]
    pub revoked: usize,
    #[ts(type = "number")]
    pub unchanged: usize,
}

impl From<PermissionAssignment> for PermissionAssignmentResponse {
    fn from(value: PermissionAssignment) -> Self {
        Self {
            group: value.descriptor.group.to_owned(),
            description: value.descriptor.description.to_owned(),
            claim_type: value.descriptor.claim_type.to_owned(),
            claim_value: value.descriptor.permission.as_str().to_owned(),
            assigned: value.assigned,
        }
    }
}

impl From<PermissionPanel> for PermissionPanelResponse {
    fn from(panel: PermissionPanel) -> Self {
        Self {
            user_id: panel.user_id.to_string(),
            user_label: panel.user_label,
            permissions: panel
                .assignments
                .into_iter()
                .map(PermissionAssignmentResponse::from)
                .collect(),
        }
    }
}

impl From<PermissionToggle> for PermissionToggleResponse {
    fn from(toggle: PermissionToggle) -> Self {
        Self {
            permission: toggle.permission.as_str().to_owned(),
            assigned: toggle.assigned,
        }
    }
}

impl From<BulkToggleOutcome> for BulkPermissionResultResponse {
    fn from(outcome: BulkToggleOutcome) -> Self {
        Self {
            granted: outcome.granted,
            revoked: outcome.revoked,
            unchanged: outcome.unchanged,
        }
    }
}
