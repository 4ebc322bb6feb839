use steward_application::{
    ActivationToggle, BulkDeletePlan, BulkDeleteOutcome, CreateUserInput, ImportReport,
    SortDirection, TenantSummary, UserAccount, UserAccountInput, UserCapabilities,
    UserDirectoryEntry, UserListQuery, UserPage, UserSort, UserSortField,
};
use steward_core::{AppError, AppResult, TenantId};
use steward_domain::{DEFAULT_PROVIDER, UserId};

use super::types::{
    ActivationToggleResponse, BulkDeletePlanResponse, BulkDeleteRequest, BulkDeleteResultResponse,
    CreateUserRequest, ImportReportResponse, TenantResponse, UserAccountRequest,
    UserCapabilitiesResponse, UserDirectoryEntryResponse, UserFormResponse, UserListQueryRequest,
    UserPageResponse, UserResponse,
};

impl UserListQueryRequest {
    /// Converts the query string into a listing request.
    pub fn into_query(self) -> AppResult<UserListQuery> {
        let field = self
            .sort
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(UserSortField::parse)
            .transpose()?
            .unwrap_or_default();

        let direction = match self.direction.as_deref().map(str::trim) {
            None | Some("") | Some("asc") => SortDirection::Ascending,
            Some("desc") => SortDirection::Descending,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "sort direction must be 'asc' or 'desc', got '{other}'"
                )));
            }
        };

        Ok(UserListQuery {
            search: self.search.unwrap_or_default(),
            role: self.role.filter(|value| !value.trim().is_empty()),
            page: self.page.unwrap_or_default(),
            page_size: self.page_size.unwrap_or_default(),
            sort: UserSort { field, direction },
        })
    }
}

impl UserAccountRequest {
    /// Parses identifiers and fills defaults for omitted fields.
    pub fn into_input(self) -> AppResult<UserAccountInput> {
        Ok(UserAccountInput {
            user_name: self.user_name,
            display_name: self.display_name,
            email: self.email,
            phone_number: self.phone_number,
            profile_picture_url: self.profile_picture_url,
            tenant_id: parse_optional(self.tenant_id.as_deref(), TenantId::parse)?,
            superior_id: parse_optional(self.superior_id.as_deref(), UserId::parse)?,
            provider: self
                .provider
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_owned()),
            is_active: self.is_active.unwrap_or(true),
            assigned_roles: self.assigned_roles,
        })
    }
}

impl CreateUserRequest {
    /// Converts the payload into a create request.
    pub fn into_input(self) -> AppResult<CreateUserInput> {
        Ok(CreateUserInput {
            account: self.account.into_input()?,
            password: self.password,
        })
    }
}

impl BulkDeleteRequest {
    /// Parses the selected identifiers.
    pub fn user_ids(&self) -> AppResult<Vec<UserId>> {
        self.user_ids
            .iter()
            .map(|value| UserId::parse(value))
            .collect()
    }
}

fn parse_optional<T>(
    value: Option<&str>,
    parse: impl Fn(&str) -> AppResult<T>,
) -> AppResult<Option<T>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(parse)
        .transpose()
}

impl From<UserAccount> for UserResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            user_name: account.user_name,
            display_name: account.display_name,
            email: account.email,
            phone_number: account.phone_number,
            profile_picture_url: account.profile_picture_url,
            tenant_id: account.tenant_id.map(|tenant_id| tenant_id.to_string()),
            tenant_name: account.tenant_name,
            superior_id: account.superior_id.map(|superior_id| superior_id.to_string()),
            provider: account.provider,
            is_active: account.is_active,
            roles: account.roles,
        }
    }
}

impl From<UserPage> for UserPageResponse {
    fn from(page: UserPage) -> Self {
        Self {
            items: page.items.into_iter().map(UserResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

impl From<UserAccountInput> for UserFormResponse {
    fn from(input: UserAccountInput) -> Self {
        Self {
            user_name: input.user_name,
            display_name: input.display_name,
            email: input.email,
            tenant_id: input.tenant_id.map(|tenant_id| tenant_id.to_string()),
            superior_id: input.superior_id.map(|superior_id| superior_id.to_string()),
            provider: input.provider,
            is_active: input.is_active,
            assigned_roles: input.assigned_roles,
        }
    }
}

impl From<UserCapabilities> for UserCapabilitiesResponse {
    fn from(value: UserCapabilities) -> Self {
        Self {
            can_create: value.can_create,
            can_search: value.can_search,
            can_edit: value.can_edit,
            can_delete: value.can_delete,
            can_activate: value.can_activate,
            can_manage_roles: value.can_manage_roles,
            can_reset_password: value.can_reset_password,
            can_manage_permissions: value.can_manage_permissions,
            can_import: value.can_import,
            can_export: value.can_export,
        }
    }
}

impl From<BulkDeletePlan> for BulkDeletePlanResponse {
    fn from(plan: BulkDeletePlan) -> Self {
        Self {
            count: plan.count(),
            user_ids: plan.user_ids.iter().map(ToString::to_string).collect(),
            excluded_self: plan.excluded_self,
        }
    }
}

impl From<BulkDeleteOutcome> for BulkDeleteResultResponse {
    fn from(outcome: BulkDeleteOutcome) -> Self {
        Self {
            deleted: outcome.deleted,
        }
    }
}

impl From<ActivationToggle> for ActivationToggleResponse {
    fn from(toggle: ActivationToggle) -> Self {
        Self {
            user_id: toggle.user_id.to_string(),
            is_active: toggle.is_active,
            error: toggle.error,
        }
    }
}

impl From<ImportReport> for ImportReportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            created: report.created,
            skipped: report.skipped,
            errors: report.errors,
        }
    }
}

impl From<UserDirectoryEntry> for UserDirectoryEntryResponse {
    fn from(entry: UserDirectoryEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            user_name: entry.user_name,
            display_name: entry.display_name,
            is_active: entry.is_active,
        }
    }
}

impl From<TenantSummary> for TenantResponse {
    fn from(tenant: TenantSummary) -> Self {
        Self {
            id: tenant.id.to_string(),
            name: tenant.name,
        }
    }
}
