mod login;
mod session;

use chrono::Utc;
use steward_core::{AppError, UserIdentity};
use tower_sessions::Session;

pub use login::login_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Unix timestamp of the sign-in that created the session.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

/// Sessions end this long after sign-in, regardless of activity.
pub const SESSION_ABSOLUTE_LIFETIME_SECONDS: i64 = 12 * 60 * 60;

/// Reads the signed-in identity, ending sessions older than the absolute lifetime.
pub async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;
    let Some(identity) = identity else {
        return Ok(None);
    };

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session age: {error}")))?
        .unwrap_or_default();

    if Utc::now().timestamp() - created_at > SESSION_ABSOLUTE_LIFETIME_SECONDS {
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to end session: {error}")))?;
        tracing::info!(subject = %identity.subject(), "session reached its absolute lifetime");
        return Ok(None);
    }

    Ok(Some(identity))
}
