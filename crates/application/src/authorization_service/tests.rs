use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use steward_core::{AppError, AppResult, UserIdentity};
use steward_domain::Permission;

use super::{AuthorizationRepository, AuthorizationService, UserCapabilities};

struct FakeAuthorizationRepository {
    map: HashMap<String, Vec<Permission>>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>> {
        Ok(self.map.get(subject).cloned().unwrap_or_default())
    }
}

/// Fails every other lookup to exercise the swallow-on-failure path.
#[derive(Default)]
struct FlakyAuthorizationRepository {
    calls: AtomicUsize,
}

#[async_trait]
impl AuthorizationRepository for FlakyAuthorizationRepository {
    async fn list_permissions_for_subject(&self, _subject: &str) -> AppResult<Vec<Permission>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 2 == 0 {
            return Err(AppError::Internal("permission store unavailable".to_owned()));
        }

        Ok(UserCapabilities::CHECKED_PERMISSIONS.to_vec())
    }
}

fn actor(subject: &str) -> UserIdentity {
    UserIdentity::new(subject, "Alice", None, None)
}

#[tokio::test]
async fn require_permission_allows_granted_subject() {
    let repository = FakeAuthorizationRepository {
        map: HashMap::from([("alice".to_owned(), vec![Permission::UsersView])]),
    };
    let service = AuthorizationService::new(Arc::new(repository));

    let result = service
        .require_permission(&actor("alice"), Permission::UsersView)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn require_permission_denies_missing_grant() {
    let repository = FakeAuthorizationRepository {
        map: HashMap::new(),
    };
    let service = AuthorizationService::new(Arc::new(repository));

    let result = service
        .require_permission(&actor("alice"), Permission::UsersCreate)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn user_capabilities_reflect_each_grant_independently() {
    let repository = FakeAuthorizationRepository {
        map: HashMap::from([(
            "alice".to_owned(),
            vec![
                Permission::UsersCreate,
                Permission::UsersExport,
                Permission::RolesView,
            ],
        )]),
    };
    let service = AuthorizationService::new(Arc::new(repository));

    let capabilities = service.user_capabilities(&actor("alice")).await;
    assert_eq!(
        capabilities,
        UserCapabilities {
            can_create: true,
            can_export: true,
            ..UserCapabilities::default()
        }
    );
}

#[tokio::test]
async fn failed_capability_checks_disable_only_their_flag() {
    let service = AuthorizationService::new(Arc::new(FlakyAuthorizationRepository::default()));

    let capabilities = service.user_capabilities(&actor("alice")).await;
    assert!(!capabilities.can_create);
    assert!(capabilities.can_search);
    assert!(!capabilities.can_edit);
    assert!(capabilities.can_delete);
    assert!(capabilities.can_export);
}
