use std::sync::Arc;

use sqlx::PgPool;
use steward_application::{
    AuditRepository, AuthorizationRepository, AuthorizationService, IdentityStore,
    PermissionPanelService, SessionService, TenantDirectory, UserAdminService,
};
use steward_core::AppResult;
use steward_infrastructure::{
    Argon2PasswordHasher, CsvSpreadsheetCodec, InMemoryAuditRepository, InMemoryIdentityStore,
    InMemoryUserDirectory, PostgresIdentityStore,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod caches;

/// Port implementations shared by every service.
#[derive(Clone)]
pub struct IdentityBackends {
    pub identity_store: Arc<dyn IdentityStore>,
    pub tenant_directory: Arc<dyn TenantDirectory>,
    pub authorization_repository: Arc<dyn AuthorizationRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl IdentityBackends {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryIdentityStore::new(Arc::new(
            Argon2PasswordHasher::new(),
        )));

        Self {
            identity_store: store.clone(),
            tenant_directory: store.clone(),
            authorization_repository: store,
            audit_repository: Arc::new(InMemoryAuditRepository::new()),
        }
    }
}

pub async fn build_identity_backends(pool: Option<PgPool>) -> AppResult<IdentityBackends> {
    let Some(pool) = pool else {
        return Ok(IdentityBackends::in_memory());
    };

    let store = Arc::new(PostgresIdentityStore::new(
        pool,
        Arc::new(Argon2PasswordHasher::new()),
    ));
    store.seed_system_roles().await?;

    Ok(IdentityBackends {
        identity_store: store.clone(),
        tenant_directory: store.clone(),
        authorization_repository: store.clone(),
        audit_repository: store,
    })
}

pub fn build_app_state(backends: IdentityBackends, config: &ApiConfig) -> AppResult<AppState> {
    let claim_cache = caches::build_claim_cache(config)?;
    let authorization_service = AuthorizationService::new(backends.authorization_repository);
    let user_directory = Arc::new(InMemoryUserDirectory::new(backends.identity_store.clone()));

    Ok(AppState {
        user_admin_service: UserAdminService::new(
            backends.identity_store.clone(),
            backends.tenant_directory,
            authorization_service.clone(),
            Arc::new(CsvSpreadsheetCodec::new()),
            user_directory,
            backends.audit_repository.clone(),
        ),
        permission_panel_service: PermissionPanelService::new(
            backends.identity_store.clone(),
            claim_cache,
            authorization_service.clone(),
            backends.audit_repository,
        )
        .with_claim_cache_ttl(config.claim_cache_ttl_seconds),
        session_service: SessionService::new(backends.identity_store),
        authorization_service,
        frontend_url: config.frontend_url.clone(),
        store_backend: config.store_backend.label(),
    })
}
