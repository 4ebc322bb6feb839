use steward_domain::AuditAction;
use tracing::info;

use super::create::normalize_roles;
use super::*;

impl UserAdminService {
    /// Overwrites the mutable fields of an account and replaces its roles.
    ///
    /// Role replacement is a diff: roles no longer requested are removed and
    /// newly requested ones added, so an empty request leaves zero roles.
    /// Without `Users.ManageRoles` memberships are left untouched. The two
    /// role writes are not transactional.
    pub async fn update_user(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        input: UserAccountInput,
    ) -> AppResult<UserAccount> {
        self.authorization_service
            .require_permission(actor, Permission::UsersEdit)
            .await?;
        let can_manage_roles = self
            .authorization_service
            .has_permission(actor, Permission::UsersManageRoles)
            .await?;

        let mut account = self.load_user(user_id).await?;

        let mut errors = Vec::new();
        let validated = self
            .validate_account_input(&input, Some(user_id), &mut errors)
            .await?;
        let Some(validated) = validated.filter(|_| errors.is_empty()) else {
            return Err(AppError::Validation(errors.join(",")));
        };
        validated.apply_to(&mut account);

        self.identity_store
            .update_user(&account)
            .await?
            .into_app_result()?;

        if can_manage_roles {
            self.replace_roles(user_id, &normalize_roles(&input.assigned_roles))
                .await?;
        }

        info!(
            subject = %actor.subject(),
            user_id = %user_id,
            "user account updated"
        );

        self.after_mutation(AuditEvent::for_user(
            actor,
            AuditAction::UserUpdated,
            user_id.to_string(),
            format!("updated user '{}'", account.user_name),
        ))
        .await?;

        self.load_user(user_id).await
    }

    async fn replace_roles(&self, user_id: UserId, requested: &[String]) -> AppResult<()> {
        let current = self.identity_store.get_roles(user_id).await?;

        let to_remove: Vec<String> = current
            .iter()
            .filter(|role| !requested.contains(role))
            .cloned()
            .collect();
        let to_add: Vec<String> = requested
            .iter()
            .filter(|role| !current.contains(role))
            .cloned()
            .collect();

        if !to_remove.is_empty() {
            self.identity_store
                .remove_from_roles(user_id, &to_remove)
                .await?
                .into_app_result()?;
        }

        if !to_add.is_empty() {
            self.identity_store
                .add_to_roles(user_id, &to_add)
                .await?
                .into_app_result()?;
        }

        Ok(())
    }
}
