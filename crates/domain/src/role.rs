/// System role holding every catalog permission.
pub const ADMIN_ROLE_NAME: &str = "Admin";

/// System role given to new accounts when no role is requested.
pub const BASIC_ROLE_NAME: &str = "Basic";

/// Role assigned to created and imported users by default.
pub const DEFAULT_ROLE_NAME: &str = BASIC_ROLE_NAME;
