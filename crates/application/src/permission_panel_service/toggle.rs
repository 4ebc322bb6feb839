use steward_domain::AuditAction;
use tracing::{info, warn};

use crate::AuditEvent;

use super::*;

impl PermissionPanelService {
    /// Flips one row: adds the claim when it was shown unassigned, removes
    /// it otherwise. The cached claim list is removed afterwards.
    pub async fn toggle_permission(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        row: PermissionToggle,
    ) -> AppResult<PermissionToggle> {
        self.authorization_service
            .require_permission(actor, Permission::UsersManagePermissions)
            .await?;
        self.load_user(user_id).await?;

        let assigned = !row.assigned;
        let write = self.write_claim(user_id, row.permission, assigned).await;
        self.claim_cache.remove(&claims_cache_key(user_id)).await?;
        write?;

        info!(
            subject = %actor.subject(),
            user_id = %user_id,
            permission = %row.permission,
            assigned,
            "user permission toggled"
        );
        self.audit_toggle(actor, user_id, row.permission, assigned)
            .await?;

        Ok(PermissionToggle {
            permission: row.permission,
            assigned,
        })
    }

    /// Applies the requested state of every submitted row.
    ///
    /// Current claims are re-read from the store before the batch, rows
    /// already in the requested state are skipped, and the cache entry is
    /// removed once at the end even when a write failed. Writes applied before
    /// a failure are kept.
    pub async fn assign_permissions(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        rows: &[PermissionToggle],
    ) -> AppResult<BulkToggleOutcome> {
        self.authorization_service
            .require_permission(actor, Permission::UsersManagePermissions)
            .await?;

        if rows.is_empty() {
            return Err(AppError::Validation(
                "submit at least one permission".to_owned(),
            ));
        }

        self.load_user(user_id).await?;
        let current = self.identity_store.get_claims(user_id).await?;

        let batch = self.apply_rows(actor, user_id, &current, rows).await;
        self.claim_cache.remove(&claims_cache_key(user_id)).await?;
        let outcome = batch?;

        info!(
            subject = %actor.subject(),
            user_id = %user_id,
            granted = outcome.granted,
            revoked = outcome.revoked,
            unchanged = outcome.unchanged,
            "user permissions assigned"
        );

        Ok(outcome)
    }

    async fn apply_rows(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        current: &[Claim],
        rows: &[PermissionToggle],
    ) -> AppResult<BulkToggleOutcome> {
        let mut outcome = BulkToggleOutcome::default();

        for row in rows {
            if holds(current, row.permission) == row.assigned {
                outcome.unchanged += 1;
                continue;
            }

            if let Err(error) = self.write_claim(user_id, row.permission, row.assigned).await {
                warn!(
                    subject = %actor.subject(),
                    user_id = %user_id,
                    permission = %row.permission,
                    error = %error,
                    "bulk permission assignment aborted"
                );
                return Err(error);
            }

            if row.assigned {
                outcome.granted += 1;
            } else {
                outcome.revoked += 1;
            }
            self.audit_toggle(actor, user_id, row.permission, row.assigned)
                .await?;
        }

        Ok(outcome)
    }

    async fn write_claim(
        &self,
        user_id: UserId,
        permission: Permission,
        assigned: bool,
    ) -> AppResult<()> {
        let claim = Claim::permission(permission);
        let result = if assigned {
            self.identity_store.add_claim(user_id, &claim).await?
        } else {
            self.identity_store.remove_claim(user_id, &claim).await?
        };

        result.into_app_result()
    }

    async fn audit_toggle(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        permission: Permission,
        assigned: bool,
    ) -> AppResult<()> {
        let (action, verb) = if assigned {
            (AuditAction::UserPermissionGranted, "granted")
        } else {
            (AuditAction::UserPermissionRevoked, "revoked")
        };

        self.audit_repository
            .append_event(AuditEvent::for_user(
                actor,
                action,
                user_id.to_string(),
                format!("{verb} permission '{permission}'"),
            ))
            .await
    }
}
