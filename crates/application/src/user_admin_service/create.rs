use steward_domain::{AuditAction, EmailAddress, UserName, validate_password};
use tracing::info;

use crate::NewUserAccount;

use super::*;

/// Account fields validated for the identity store.
pub(super) struct ValidatedAccount {
    pub(super) user_name: String,
    pub(super) display_name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) phone_number: Option<String>,
    pub(super) profile_picture_url: Option<String>,
    pub(super) tenant_id: Option<TenantId>,
    pub(super) tenant_name: Option<String>,
    pub(super) superior_id: Option<UserId>,
    pub(super) provider: String,
    pub(super) is_active: bool,
}

impl UserAdminService {
    /// Returns the pre-seeded values of the "new user" form.
    #[must_use]
    pub fn new_user_template(&self) -> UserAccountInput {
        UserAccountInput::default()
    }

    /// Creates an account and assigns its roles.
    ///
    /// Roles fall back to the default role when none were requested or the
    /// principal cannot manage roles. All validation messages are reported
    /// together, comma-joined.
    pub async fn create_user(
        &self,
        actor: &UserIdentity,
        input: CreateUserInput,
    ) -> AppResult<UserAccount> {
        self.authorization_service
            .require_permission(actor, Permission::UsersCreate)
            .await?;
        let can_manage_roles = self
            .authorization_service
            .has_permission(actor, Permission::UsersManageRoles)
            .await?;

        let mut errors = Vec::new();
        if let Err(error) = validate_password(&input.password) {
            errors.push(validation_message(error));
        }
        let validated = self
            .validate_account_input(&input.account, None, &mut errors)
            .await?;
        let Some(validated) = validated.filter(|_| errors.is_empty()) else {
            return Err(AppError::Validation(errors.join(",")));
        };

        let user_name = validated.user_name.clone();
        let user_id = self
            .identity_store
            .create_user(validated.into_new_account(), Some(&input.password))
            .await?
            .into_app_result()?;

        let mut roles = if can_manage_roles {
            normalize_roles(&input.account.assigned_roles)
        } else {
            Vec::new()
        };
        if roles.is_empty() {
            roles.push(DEFAULT_ROLE_NAME.to_owned());
        }
        self.identity_store
            .add_to_roles(user_id, &roles)
            .await?
            .into_app_result()?;

        info!(
            subject = %actor.subject(),
            user_id = %user_id,
            user_name = %user_name,
            "user account created"
        );

        self.after_mutation(AuditEvent::for_user(
            actor,
            AuditAction::UserCreated,
            user_id.to_string(),
            format!("created user '{user_name}' with roles [{}]", roles.join(", ")),
        ))
        .await?;

        self.load_user(user_id).await
    }

    /// Validates form values, collecting every message into `errors`.
    ///
    /// Returns `None` when a field could not be converted at all.
    pub(super) async fn validate_account_input(
        &self,
        input: &UserAccountInput,
        editing: Option<UserId>,
        errors: &mut Vec<String>,
    ) -> AppResult<Option<ValidatedAccount>> {
        let user_name = match UserName::new(input.user_name.as_str()) {
            Ok(user_name) => Some(String::from(user_name)),
            Err(error) => {
                errors.push(validation_message(error));
                None
            }
        };

        let email = match non_blank(input.email.as_deref()) {
            Some(email) => match EmailAddress::new(email) {
                Ok(email) => Some(String::from(email)),
                Err(error) => {
                    errors.push(validation_message(error));
                    None
                }
            },
            None => None,
        };

        let tenant_name = match input.tenant_id {
            Some(tenant_id) => {
                let tenants = self.tenant_directory.list_tenants().await?;
                match tenants.into_iter().find(|tenant| tenant.id == tenant_id) {
                    Some(tenant) => Some(tenant.name),
                    None => {
                        errors.push(format!("tenant '{tenant_id}' does not exist"));
                        None
                    }
                }
            }
            None => None,
        };

        if let Some(superior_id) = input.superior_id {
            if editing == Some(superior_id) {
                errors.push("a user cannot be their own superior".to_owned());
            } else if self.identity_store.find_by_id(superior_id).await?.is_none() {
                errors.push(format!("superior '{superior_id}' does not exist"));
            }
        }

        let provider = non_blank(Some(input.provider.as_str()))
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_owned());

        Ok(user_name.map(|user_name| ValidatedAccount {
            user_name,
            display_name: non_blank(input.display_name.as_deref()),
            email,
            phone_number: non_blank(input.phone_number.as_deref()),
            profile_picture_url: non_blank(input.profile_picture_url.as_deref()),
            tenant_id: input.tenant_id,
            tenant_name,
            superior_id: input.superior_id,
            provider,
            is_active: input.is_active,
        }))
    }
}

impl ValidatedAccount {
    fn into_new_account(self) -> NewUserAccount {
        NewUserAccount {
            user_name: self.user_name,
            display_name: self.display_name,
            email: self.email,
            phone_number: self.phone_number,
            profile_picture_url: self.profile_picture_url,
            tenant_id: self.tenant_id,
            tenant_name: self.tenant_name,
            superior_id: self.superior_id,
            provider: self.provider,
            is_active: self.is_active,
        }
    }

    pub(super) fn apply_to(self, account: &mut UserAccount) {
        account.user_name = self.user_name;
        account.display_name = self.display_name;
        account.email = self.email;
        account.phone_number = self.phone_number;
        account.profile_picture_url = self.profile_picture_url;
        account.tenant_id = self.tenant_id;
        account.tenant_name = self.tenant_name;
        account.superior_id = self.superior_id;
        account.provider = self.provider;
        account.is_active = self.is_active;
    }
}

/// Trims, drops blanks and de-duplicates requested role names.
pub(super) fn normalize_roles(requested: &[String]) -> Vec<String> {
    let mut roles: Vec<String> = requested
        .iter()
        .filter_map(|role| non_blank(Some(role.as_str())))
        .collect();
    roles.sort();
    roles.dedup();
    roles
}
