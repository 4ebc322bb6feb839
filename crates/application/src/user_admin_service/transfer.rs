use std::collections::HashMap;

use steward_domain::{AuditAction, EmailAddress, UserName};
use tracing::{info, warn};

use crate::{MatchMode, NewUserAccount, TenantSummary, UserFilter};

use super::*;

/// Column headers written by export, in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Id",
    "User Name",
    "Display Name",
    "Email",
    "Phone Number",
    "Tenant Id",
    "Tenant Name",
];

/// Column headers understood by import. Unknown columns are ignored.
pub const IMPORT_COLUMNS: [&str; 6] = [
    "User Name",
    "Display Name",
    "Email",
    "Phone Number",
    "Tenant Name",
    "Tenant Id",
];

#[derive(Debug, Default)]
struct ImportedRow {
    user_name: String,
    display_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    tenant_name: Option<String>,
    tenant_id: Option<String>,
}

impl ImportedRow {
    fn from_cells(cells: &HashMap<String, String>) -> Self {
        let mut row = Self::default();
        for column in IMPORT_COLUMNS {
            if let Some(value) = cells.get(column) {
                row.map_column(column, value);
            }
        }
        row
    }

    fn map_column(&mut self, column: &str, value: &str) {
        let value = non_blank(Some(value));
        match column {
            "User Name" => self.user_name = value.unwrap_or_default(),
            "Display Name" => self.display_name = value,
            "Email" => self.email = value,
            "Phone Number" => self.phone_number = value,
            "Tenant Name" => self.tenant_name = value,
            "Tenant Id" => self.tenant_id = value,
            _ => {}
        }
    }
}

impl UserAdminService {
    /// Encodes every account matching the listing predicate.
    ///
    /// The search text is lower-cased like the grid's, but account fields
    /// keep their case, so mixed-case values only match by their lower-case
    /// parts.
    pub async fn export_users(
        &self,
        actor: &UserIdentity,
        search: &str,
        role: Option<&str>,
    ) -> AppResult<ExportedFile> {
        self.authorization_service
            .require_permission(actor, Permission::UsersExport)
            .await?;

        let filter = UserFilter {
            search: search.trim().to_lowercase(),
            role: non_blank(role),
            match_mode: MatchMode::CaseSensitive,
        };
        let accounts = self.identity_store.list_users(&filter).await?;

        let rows: Vec<Vec<String>> = accounts
            .iter()
            .map(|account| {
                vec![
                    account.id.to_string(),
                    account.user_name.clone(),
                    account.display_name.clone().unwrap_or_default(),
                    account.email.clone().unwrap_or_default(),
                    account.phone_number.clone().unwrap_or_default(),
                    account
                        .tenant_id
                        .map(|tenant_id| tenant_id.to_string())
                        .unwrap_or_default(),
                    account.tenant_name.clone().unwrap_or_default(),
                ]
            })
            .collect();
        let exported = rows.len();

        let content = self
            .spreadsheet_codec
            .export(&EXPORT_COLUMNS, rows, USERS_SHEET_NAME)
            .await?;

        info!(subject = %actor.subject(), exported, "users exported");

        self.audit_repository
            .append_event(AuditEvent::for_user(
                actor,
                AuditAction::UsersExported,
                USERS_SHEET_NAME,
                format!("exported {exported} users"),
            ))
            .await?;

        Ok(ExportedFile {
            file_name: format!(
                "{USERS_SHEET_NAME}.{}",
                self.spreadsheet_codec.file_extension()
            ),
            content_type: self.spreadsheet_codec.content_type().to_owned(),
            content,
        })
    }

    /// Creates accounts from an uploaded sheet.
    ///
    /// Existing user names are skipped. Per-row failures are collected and
    /// never abort the import; a file the codec cannot decode is rejected
    /// with the codec's messages.
    pub async fn import_users(
        &self,
        actor: &UserIdentity,
        content: &[u8],
    ) -> AppResult<ImportReport> {
        self.authorization_service
            .require_permission(actor, Permission::UsersImport)
            .await?;

        let sheet = self
            .spreadsheet_codec
            .import(content, USERS_SHEET_NAME)
            .await?;
        if !sheet.errors.is_empty() {
            return Err(AppError::Validation(sheet.errors.join(",")));
        }

        let tenants = self.tenant_directory.list_tenants().await?;
        let mut report = ImportReport::default();

        for (index, cells) in sheet.rows.iter().enumerate() {
            // Data rows start below the header line.
            let line = index + 2;
            let row = ImportedRow::from_cells(cells);

            match self.import_row(row, &tenants).await {
                Ok(RowOutcome::Created) => report.created += 1,
                Ok(RowOutcome::Skipped) => report.skipped += 1,
                Err(error) => {
                    let message = format!("row {line}: {}", validation_message(error));
                    warn!(subject = %actor.subject(), error = %message, "user import row failed");
                    report.errors.push(message);
                }
            }
        }

        info!(
            subject = %actor.subject(),
            created = report.created,
            skipped = report.skipped,
            failed = report.errors.len(),
            "users imported"
        );

        if report.created > 0 {
            self.after_mutation(AuditEvent::for_user(
                actor,
                AuditAction::UsersImported,
                USERS_SHEET_NAME,
                format!(
                    "imported {} users, skipped {}",
                    report.created, report.skipped
                ),
            ))
            .await?;
        }

        Ok(report)
    }

    async fn import_row(
        &self,
        row: ImportedRow,
        tenants: &[TenantSummary],
    ) -> AppResult<RowOutcome> {
        let user_name = UserName::new(row.user_name)?;
        if self
            .identity_store
            .find_by_user_name(user_name.as_str())
            .await?
            .is_some()
        {
            return Ok(RowOutcome::Skipped);
        }

        let email = row
            .email
            .map(EmailAddress::new)
            .transpose()?
            .map(String::from);
        let tenant = resolve_tenant(
            tenants,
            row.tenant_name.as_deref(),
            row.tenant_id.as_deref(),
        );

        let user_id = self
            .identity_store
            .create_user(
                NewUserAccount {
                    user_name: user_name.into(),
                    display_name: row.display_name,
                    email,
                    phone_number: row.phone_number,
                    profile_picture_url: None,
                    tenant_id: tenant.map(|tenant| tenant.id),
                    tenant_name: tenant.map(|tenant| tenant.name.clone()),
                    superior_id: None,
                    provider: DEFAULT_PROVIDER.to_owned(),
                    is_active: true,
                },
                None,
            )
            .await?
            .into_app_result()?;

        self.identity_store
            .add_to_roles(user_id, &[DEFAULT_ROLE_NAME.to_owned()])
            .await?
            .into_app_result()?;

        Ok(RowOutcome::Created)
    }
}

enum RowOutcome {
    Created,
    Skipped,
}

/// Picks the tenant by name, then by id, then the first known tenant.
fn resolve_tenant<'a>(
    tenants: &'a [TenantSummary],
    tenant_name: Option<&str>,
    tenant_id: Option<&str>,
) -> Option<&'a TenantSummary> {
    tenant_name
        .and_then(|name| tenants.iter().find(|tenant| tenant.name == name))
        .or_else(|| {
            let tenant_id = TenantId::parse(tenant_id?).ok()?;
            tenants.iter().find(|tenant| tenant.id == tenant_id)
        })
        .or_else(|| tenants.first())
}
