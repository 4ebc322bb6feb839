use std::collections::HashMap;
use std::sync::atomic::Ordering;

use steward_core::AppError;
use steward_domain::{AuditAction, Permission, UserId};

use crate::test_support::Fixture;
use crate::{
    ImportedSheet, SortDirection, UserAccountInput, UserSort, UserSortField,
};

use super::{BulkDeleteOutcome, CreateUserInput, EXPORT_COLUMNS, UserListQuery};

fn create_input(user_name: &str, roles: &[&str]) -> CreateUserInput {
    CreateUserInput {
        account: UserAccountInput {
            user_name: user_name.to_owned(),
            email: Some(format!("{user_name}@example.com")),
            assigned_roles: roles.iter().map(|role| (*role).to_owned()).collect(),
            ..UserAccountInput::default()
        },
        password: "correct-horse-battery".to_owned(),
    }
}

#[tokio::test]
async fn listing_pages_never_exceed_page_size_and_total_counts_all_matches() {
    let fixture = Fixture::new().await;
    for index in 0..7 {
        fixture.store.seed(&format!("user{index}"), &["Basic"]).await;
    }

    let page = fixture
        .users
        .list_users(
            &fixture.actor,
            UserListQuery {
                search: "USER".to_owned(),
                page: 1,
                page_size: 3,
                ..UserListQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total, 7);
    assert_eq!(page.items[0].user_name, "user3");
}

#[tokio::test]
async fn listing_clamps_page_size_and_sorts_descending() {
    let fixture = Fixture::new().await;
    fixture.store.seed("bob", &["Basic"]).await;
    fixture.store.seed("carol", &["Manager"]).await;

    let page = fixture
        .users
        .list_users(
            &fixture.actor,
            UserListQuery {
                page_size: 10_000,
                sort: UserSort {
                    field: UserSortField::UserName,
                    direction: SortDirection::Descending,
                },
                ..UserListQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.page_size, super::MAX_PAGE_SIZE);
    let names: Vec<&str> = page.items.iter().map(|item| item.user_name.as_str()).collect();
    assert_eq!(names, vec!["carol", "bob", "admin"]);
}

#[tokio::test]
async fn listing_intersects_search_with_role_filter() {
    let fixture = Fixture::new().await;
    fixture.store.seed("bob", &["Basic"]).await;
    fixture.store.seed("bobby", &["Manager"]).await;

    let page = fixture
        .users
        .list_users(
            &fixture.actor,
            UserListQuery {
                search: "bob".to_owned(),
                role: Some("Manager".to_owned()),
                ..UserListQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_name, "bobby");
    assert_eq!(page.page_size, super::DEFAULT_PAGE_SIZE);
}

#[tokio::test]
async fn listing_ignores_whitespace_around_search_text() {
    let fixture = Fixture::new().await;
    fixture.store.seed("Smith", &["Basic"]).await;
    fixture.store.seed("jones", &["Basic"]).await;

    let page = fixture
        .users
        .list_users(
            &fixture.actor,
            UserListQuery {
                search: " smith ".to_owned(),
                ..UserListQuery::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_name, "Smith");
}

#[tokio::test]
async fn search_requires_search_permission_but_plain_listing_does_not() {
    let fixture = Fixture::with_permissions(vec![Permission::UsersView]).await;

    let plain = fixture
        .users
        .list_users(&fixture.actor, UserListQuery::default())
        .await;
    assert!(plain.is_ok());

    let searched = fixture
        .users
        .list_users(
            &fixture.actor,
            UserListQuery {
                search: "adm".to_owned(),
                ..UserListQuery::default()
            },
        )
        .await;
    assert!(matches!(searched, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn new_user_template_is_preseeded() {
    let fixture = Fixture::new().await;
    let template = fixture.users.new_user_template();

    assert_eq!(template.provider, "Local");
    assert!(template.is_active);
    assert_eq!(template.assigned_roles, vec!["Basic".to_owned()]);
}

#[tokio::test]
async fn create_assigns_requested_roles_and_records_side_effects() {
    let fixture = Fixture::new().await;

    let created = fixture
        .users
        .create_user(&fixture.actor, create_input("dora", &["Manager", "Basic"]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(created.roles, vec!["Basic".to_owned(), "Manager".to_owned()]);
    assert_eq!(
        fixture.store.passwords.lock().await.get(&created.id).cloned(),
        Some("correct-horse-battery".to_owned())
    );
    assert_eq!(fixture.directory.refreshes.load(Ordering::SeqCst), 1);
    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::UserCreated);
}

#[tokio::test]
async fn create_falls_back_to_default_role() {
    let fixture = Fixture::new().await;

    let created = fixture
        .users
        .create_user(&fixture.actor, create_input("erin", &[]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(created.roles, vec!["Basic".to_owned()]);
}

#[tokio::test]
async fn create_ignores_roles_without_manage_roles_permission() {
    let fixture = Fixture::with_permissions(vec![Permission::UsersCreate]).await;

    let created = fixture
        .users
        .create_user(&fixture.actor, create_input("fred", &["Admin"]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(created.roles, vec!["Basic".to_owned()]);
}

#[tokio::test]
async fn create_reports_every_validation_error_at_once() {
    let fixture = Fixture::new().await;
    let mut input = create_input("bad name", &[]);
    input.account.email = Some("not-an-email".to_owned());
    input.password = "short".to_owned();

    let result = fixture.users.create_user(&fixture.actor, input).await;

    let Err(AppError::Validation(message)) = result else {
        unreachable!("expected a validation error");
    };
    assert_eq!(message.split(',').count(), 3);
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn create_surfaces_store_rejections() {
    let fixture = Fixture::new().await;

    let result = fixture
        .users
        .create_user(&fixture.actor, create_input("ADMIN", &[]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("already taken")));
}

#[tokio::test]
async fn update_replaces_roles_by_difference() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("gina", &["Basic", "Manager"]).await;

    let updated = fixture
        .users
        .update_user(
            &fixture.actor,
            user_id,
            UserAccountInput {
                user_name: "gina".to_owned(),
                display_name: Some("Gina".to_owned()),
                assigned_roles: vec!["Manager".to_owned(), "Admin".to_owned()],
                ..UserAccountInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.roles, vec!["Admin".to_owned(), "Manager".to_owned()]);
    assert_eq!(updated.display_name.as_deref(), Some("Gina"));
    assert_eq!(
        *fixture.store.role_writes.lock().await,
        vec!["-Basic".to_owned(), "+Admin".to_owned()]
    );
}

#[tokio::test]
async fn update_with_empty_role_request_leaves_zero_roles() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("hank", &["Basic", "Manager"]).await;

    let updated = fixture
        .users
        .update_user(
            &fixture.actor,
            user_id,
            UserAccountInput {
                user_name: "hank".to_owned(),
                assigned_roles: Vec::new(),
                ..UserAccountInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(updated.roles.is_empty());
}

#[tokio::test]
async fn update_rejects_missing_user_and_self_superior() {
    let fixture = Fixture::new().await;
    let missing = fixture
        .users
        .update_user(&fixture.actor, UserId::new(), UserAccountInput::default())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let user_id = fixture.store.seed("ivan", &["Basic"]).await;
    let own_superior = fixture
        .users
        .update_user(
            &fixture.actor,
            user_id,
            UserAccountInput {
                user_name: "ivan".to_owned(),
                superior_id: Some(user_id),
                ..UserAccountInput::default()
            },
        )
        .await;
    assert!(matches!(own_superior, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn delete_refuses_own_account_and_missing_targets() {
    let fixture = Fixture::new().await;

    let own = fixture
        .users
        .delete_user(&fixture.actor, fixture.actor_id)
        .await;
    assert!(matches!(own, Err(AppError::Forbidden(_))));

    let missing = fixture.users.delete_user(&fixture.actor, UserId::new()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn bulk_delete_drops_principal_from_selection() {
    let fixture = Fixture::new().await;
    let first = fixture.store.seed("jack", &["Basic"]).await;
    let second = fixture.store.seed("kate", &["Basic"]).await;
    let selection = [first, fixture.actor_id, second];

    let plan = fixture
        .users
        .preview_bulk_delete(&fixture.actor, &selection)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(plan.count(), 2);
    assert!(plan.excluded_self);

    let outcome = fixture
        .users
        .delete_users(&fixture.actor, &selection)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(outcome.deleted, 2);
    assert!(fixture.store.account(fixture.actor_id).await.is_some());
    assert!(fixture.store.account(first).await.is_none());
    assert!(fixture.store.account(second).await.is_none());
}

#[tokio::test]
async fn bulk_delete_of_only_the_principal_is_refused() {
    let fixture = Fixture::new().await;

    let result = fixture
        .users
        .delete_users(&fixture.actor, &[fixture.actor_id])
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn bulk_delete_stops_at_first_failure_and_reports_progress() {
    let fixture = Fixture::new().await;
    let first = fixture.store.seed("lena", &["Basic"]).await;
    let failing = fixture.store.seed("mike", &["Basic"]).await;
    let last = fixture.store.seed("nina", &["Basic"]).await;
    fixture.store.failing_deletes.lock().await.push(failing);

    let result = fixture
        .users
        .delete_users(&fixture.actor, &[first, failing, last])
        .await;

    assert!(matches!(result, Err(AppError::Internal(message)) if message.contains("1 users were deleted")));
    assert!(fixture.store.account(first).await.is_none());
    assert!(fixture.store.account(last).await.is_some());
}

#[tokio::test]
async fn bulk_delete_skips_users_removed_since_selection() {
    let fixture = Fixture::new().await;
    let first = fixture.store.seed("lena", &["Basic"]).await;
    let last = fixture.store.seed("nina", &["Basic"]).await;

    let result = fixture
        .users
        .delete_users(&fixture.actor, &[first, UserId::new(), last])
        .await;

    assert!(matches!(result, Ok(BulkDeleteOutcome { deleted: 2 })));
    assert!(fixture.store.account(first).await.is_none());
    assert!(fixture.store.account(last).await.is_none());
    assert_eq!(fixture.audit.events.lock().await.len(), 1);
}

#[tokio::test]
async fn toggle_active_flips_displayed_state() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("olga", &["Basic"]).await;

    let toggle = fixture
        .users
        .toggle_active(&fixture.actor, user_id, true)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(!toggle.is_active);
    assert!(toggle.error.is_none());
    assert!(matches!(fixture.store.account(user_id).await, Some(account) if !account.is_active));
}

#[tokio::test]
async fn toggle_active_reports_store_rejection_with_flipped_flag() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("pete", &["Basic"]).await;
    fixture.store.failing_updates.lock().await.push(user_id);

    let toggle = fixture
        .users
        .toggle_active(&fixture.actor, user_id, true)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(!toggle.is_active);
    assert_eq!(toggle.error.as_deref(), Some("concurrency failure"));
    assert!(matches!(fixture.store.account(user_id).await, Some(account) if account.is_active));
}

#[tokio::test]
async fn reset_password_issues_and_redeems_token() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("quinn", &["Basic"]).await;

    let result = fixture
        .users
        .reset_password(&fixture.actor, user_id, "another-long-secret")
        .await;

    assert!(result.is_ok());
    assert_eq!(
        fixture.store.passwords.lock().await.get(&user_id).cloned(),
        Some("another-long-secret".to_owned())
    );
    assert!(fixture.store.reset_tokens.lock().await.is_empty());
}

#[tokio::test]
async fn reset_password_validates_before_touching_the_store() {
    let fixture = Fixture::new().await;
    let user_id = fixture.store.seed("rita", &["Basic"]).await;

    let result = fixture
        .users
        .reset_password(&fixture.actor, user_id, "short")
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(fixture.store.reset_tokens.lock().await.is_empty());
}

#[tokio::test]
async fn export_lowercases_search_but_not_account_fields() {
    let fixture = Fixture::new().await;
    fixture.store.seed("sam", &["Basic"]).await;
    fixture.store.seed("Samuel", &["Basic"]).await;

    let file = fixture
        .users
        .export_users(&fixture.actor, "Sam", None)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(file.file_name, "Users.csv");
    assert_eq!(file.content_type, "text/csv");
    let exported = fixture.codec.exported.lock().await;
    let (headers, rows) = &exported[0];
    assert_eq!(headers, &EXPORT_COLUMNS.map(str::to_owned).to_vec());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "sam");
}

fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
    cells
        .iter()
        .map(|(column, value)| ((*column).to_owned(), (*value).to_owned()))
        .collect()
}

#[tokio::test]
async fn import_skips_existing_users_and_resolves_tenants() {
    let fixture = Fixture::new().await;
    let first_tenant = fixture.tenants.add("Head Office").await;
    let branch = fixture.tenants.add("Branch").await;
    let existing = fixture.store.seed("tom", &["Manager"]).await;
    *fixture.codec.sheet.lock().await = ImportedSheet {
        rows: vec![
            row(&[("User Name", "tom"), ("Display Name", "Changed")]),
            row(&[("User Name", "uma"), ("Tenant Name", "Branch"), ("Email", "UMA@example.com")]),
            row(&[("User Name", "vic"), ("Tenant Name", "Nowhere")]),
        ],
        errors: Vec::new(),
    };

    let report = fixture
        .users
        .import_users(&fixture.actor, b"ignored")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(report.created, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.errors.is_empty());

    let unchanged = fixture.store.account(existing).await;
    assert!(matches!(unchanged, Some(account) if account.display_name.is_none() && account.roles == vec!["Manager".to_owned()]));

    let uma = fixture.store.find_by_user_name_for_test("uma").await;
    assert!(matches!(uma, Some(ref account) if account.tenant_id == Some(branch.id)));
    assert!(matches!(uma, Some(ref account) if account.email.as_deref() == Some("uma@example.com")));
    assert!(matches!(uma, Some(ref account) if account.roles == vec!["Basic".to_owned()]));

    let vic = fixture.store.find_by_user_name_for_test("vic").await;
    assert!(matches!(vic, Some(account) if account.tenant_id == Some(first_tenant.id)));
}

#[tokio::test]
async fn import_accumulates_row_errors_without_aborting() {
    let fixture = Fixture::new().await;
    *fixture.codec.sheet.lock().await = ImportedSheet {
        rows: vec![
            row(&[("User Name", "")]),
            row(&[("User Name", "wes"), ("Email", "broken")]),
            row(&[("User Name", "xena")]),
        ],
        errors: Vec::new(),
    };

    let report = fixture
        .users
        .import_users(&fixture.actor, b"ignored")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(report.created, 1);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].starts_with("row 2:"));
    assert!(report.errors[1].starts_with("row 3:"));
}

#[tokio::test]
async fn import_rejects_undecodable_sheet() {
    let fixture = Fixture::new().await;
    *fixture.codec.sheet.lock().await = ImportedSheet {
        rows: Vec::new(),
        errors: vec!["line 3: unequal lengths".to_owned()],
    };

    let result = fixture.users.import_users(&fixture.actor, b"ignored").await;

    assert!(matches!(result, Err(AppError::Validation(message)) if message.contains("unequal lengths")));
}
