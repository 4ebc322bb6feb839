use serde::{Deserialize, Serialize};

use crate::Permission;

/// Claim type used for every permission grant.
pub const PERMISSION_CLAIM_TYPE: &str = "Permission";

/// A `(type, value)` pair attached to a user or role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    claim_type: String,
    value: String,
}

impl Claim {
    /// Creates a claim from raw type and value strings.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    /// Creates the permission claim granting `permission`.
    #[must_use]
    pub fn permission(permission: Permission) -> Self {
        Self::new(PERMISSION_CLAIM_TYPE, permission.as_str())
    }

    /// Returns the claim type.
    #[must_use]
    pub fn claim_type(&self) -> &str {
        self.claim_type.as_str()
    }

    /// Returns the claim value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the granted permission when this is a known permission claim.
    #[must_use]
    pub fn as_permission(&self) -> Option<Permission> {
        if self.claim_type != PERMISSION_CLAIM_TYPE {
            return None;
        }

        self.value.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{Claim, PERMISSION_CLAIM_TYPE};
    use crate::Permission;

    #[test]
    fn permission_claim_uses_permission_type() {
        let claim = Claim::permission(Permission::UsersCreate);
        assert_eq!(claim.claim_type(), PERMISSION_CLAIM_TYPE);
        assert_eq!(claim.value(), "Users.Create");
        assert_eq!(claim.as_permission(), Some(Permission::UsersCreate));
    }

    #[test]
    fn foreign_claim_type_is_not_a_permission() {
        let claim = Claim::new("Department", "Users.Create");
        assert_eq!(claim.as_permission(), None);
    }
}
