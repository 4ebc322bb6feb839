use steward_domain::{AuditAction, validate_password};
use tracing::info;

use super::*;

impl UserAdminService {
    /// Sets a new password by issuing a reset token and redeeming it at once.
    pub async fn reset_password(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        new_password: &str,
    ) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, Permission::UsersResetPassword)
            .await?;

        validate_password(new_password)?;
        let account = self.load_user(user_id).await?;

        let token = self
            .identity_store
            .generate_password_reset_token(user_id)
            .await?;
        self.identity_store
            .reset_password(user_id, &token, new_password)
            .await?
            .into_app_result()?;

        info!(subject = %actor.subject(), user_id = %user_id, "user password reset");

        self.audit_repository
            .append_event(AuditEvent::for_user(
                actor,
                AuditAction::UserPasswordReset,
                user_id.to_string(),
                format!("reset password of user '{}'", account.user_name),
            ))
            .await
    }
}
