use steward_domain::AuditAction;
use tracing::{info, warn};

use super::*;

impl UserAdminService {
    /// Flips the active flag relative to `displayed_active` and persists it.
    ///
    /// Store rejections are reported in [`ActivationToggle::error`] while the
    /// flipped flag is still returned. Missing accounts and infrastructure
    /// failures are errors.
    pub async fn toggle_active(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        displayed_active: bool,
    ) -> AppResult<ActivationToggle> {
        self.authorization_service
            .require_permission(actor, Permission::UsersActive)
            .await?;

        let mut account = self.load_user(user_id).await?;
        let is_active = !displayed_active;
        account.is_active = is_active;

        if let crate::IdentityResult::Failed(errors) =
            self.identity_store.update_user(&account).await?
        {
            let error = errors.join(",");
            warn!(
                subject = %actor.subject(),
                user_id = %user_id,
                error = %error,
                "activation change rejected by identity store"
            );
            return Ok(ActivationToggle {
                user_id,
                is_active,
                error: Some(error),
            });
        }

        info!(
            subject = %actor.subject(),
            user_id = %user_id,
            is_active,
            "user activation changed"
        );

        self.after_mutation(AuditEvent::for_user(
            actor,
            AuditAction::UserActivationChanged,
            user_id.to_string(),
            if is_active {
                format!("activated user '{}'", account.user_name)
            } else {
                format!("deactivated user '{}'", account.user_name)
            },
        ))
        .await?;

        Ok(ActivationToggle {
            user_id,
            is_active,
            error: None,
        })
    }
}
