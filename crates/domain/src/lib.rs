//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod claim;
mod role;
mod security;
mod user;

pub use claim::{Claim, PERMISSION_CLAIM_TYPE};
pub use role::{ADMIN_ROLE_NAME, BASIC_ROLE_NAME, DEFAULT_ROLE_NAME};
pub use security::{AuditAction, PERMISSION_CATALOG, Permission, PermissionGroup};
pub use user::{
    DEFAULT_PROVIDER, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USER_NAME_MAX_LENGTH,
    UserId, UserName, validate_password,
};
