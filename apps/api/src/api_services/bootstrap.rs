use steward_application::BootstrapService;
use steward_core::AppResult;
use tracing::info;

use crate::api_config::ApiConfig;

use super::IdentityBackends;

pub async fn seed_bootstrap_admin(
    backends: &IdentityBackends,
    config: &ApiConfig,
) -> AppResult<()> {
    let Some(admin) = config.bootstrap_admin.as_ref() else {
        return Ok(());
    };

    let service = BootstrapService::new(
        backends.identity_store.clone(),
        backends.tenant_directory.clone(),
    );

    if let Some(user_id) = service.seed_admin(admin).await? {
        info!(%user_id, user_name = %admin.user_name, "bootstrap administrator created");
    }

    Ok(())
}
