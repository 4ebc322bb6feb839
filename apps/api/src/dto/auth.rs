use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for user name and password sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "login-request.ts")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}
