use steward_domain::AuditAction;
use tracing::{info, warn};

use super::*;

impl UserAdminService {
    /// Deletes one account. The principal's own account is refused.
    pub async fn delete_user(&self, actor: &UserIdentity, user_id: UserId) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor, Permission::UsersDelete)
            .await?;

        if is_self(actor, user_id) {
            return Err(AppError::Forbidden(
                "you cannot delete your own account".to_owned(),
            ));
        }

        let account = self.load_user(user_id).await?;
        self.identity_store
            .delete_user(user_id)
            .await?
            .into_app_result()?;

        info!(subject = %actor.subject(), user_id = %user_id, "user account deleted");

        self.after_mutation(AuditEvent::for_user(
            actor,
            AuditAction::UserDeleted,
            user_id.to_string(),
            format!("deleted user '{}'", account.user_name),
        ))
        .await
    }

    /// Computes the effective bulk-delete selection.
    ///
    /// The principal's own id is dropped silently; a selection holding only
    /// that id is refused. Duplicate ids are collapsed.
    pub async fn preview_bulk_delete(
        &self,
        actor: &UserIdentity,
        selection: &[UserId],
    ) -> AppResult<BulkDeletePlan> {
        self.authorization_service
            .require_permission(actor, Permission::UsersDelete)
            .await?;

        let mut user_ids: Vec<UserId> = Vec::with_capacity(selection.len());
        let mut excluded_self = false;
        for user_id in selection {
            if is_self(actor, *user_id) {
                excluded_self = true;
            } else if !user_ids.contains(user_id) {
                user_ids.push(*user_id);
            }
        }

        if user_ids.is_empty() {
            return Err(if excluded_self {
                AppError::Forbidden("you cannot delete your own account".to_owned())
            } else {
                AppError::Validation("select at least one user to delete".to_owned())
            });
        }

        Ok(BulkDeletePlan {
            user_ids,
            excluded_self,
        })
    }

    /// Deletes the effective selection sequentially.
    ///
    /// Accounts that vanished since the selection was made are skipped. The
    /// first store failure aborts the rest; earlier deletions stay applied and
    /// the error reports how many succeeded.
    pub async fn delete_users(
        &self,
        actor: &UserIdentity,
        selection: &[UserId],
    ) -> AppResult<BulkDeleteOutcome> {
        let plan = self.preview_bulk_delete(actor, selection).await?;

        let mut deleted_ids = Vec::with_capacity(plan.user_ids.len());
        let mut failure = None;
        for user_id in &plan.user_ids {
            match self.delete_one(*user_id).await {
                Ok(true) => deleted_ids.push(user_id.to_string()),
                Ok(false) => {
                    warn!(
                        subject = %actor.subject(),
                        user_id = %user_id,
                        "selected user no longer exists, skipping"
                    );
                }
                Err(error) => {
                    warn!(
                        subject = %actor.subject(),
                        user_id = %user_id,
                        deleted = deleted_ids.len(),
                        error = %error,
                        "bulk delete aborted"
                    );
                    failure = Some(error);
                    break;
                }
            }
        }

        let deleted = deleted_ids.len();
        if deleted > 0 {
            self.after_mutation(AuditEvent::for_user(
                actor,
                AuditAction::UserDeleted,
                deleted_ids.join(","),
                format!("bulk deleted {deleted} users"),
            ))
            .await?;
        }

        if let Some(error) = failure {
            return Err(match error {
                AppError::NotFound(message) => AppError::NotFound(format!(
                    "{message}; {deleted} users were deleted before the failure"
                )),
                AppError::Validation(message) => AppError::Validation(format!(
                    "{message}; {deleted} users were deleted before the failure"
                )),
                other => AppError::Internal(format!(
                    "{other}; {deleted} users were deleted before the failure"
                )),
            });
        }

        info!(subject = %actor.subject(), deleted, "bulk user delete completed");
        Ok(BulkDeleteOutcome { deleted })
    }

    /// Returns `false` when the account is already gone.
    async fn delete_one(&self, user_id: UserId) -> AppResult<bool> {
        if self.identity_store.find_by_id(user_id).await?.is_none() {
            return Ok(false);
        }

        self.identity_store
            .delete_user(user_id)
            .await?
            .into_app_result()?;
        Ok(true)
    }
}
