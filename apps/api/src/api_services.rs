mod bootstrap;
mod database;
mod sessions;
mod state_builder;

pub use bootstrap::seed_bootstrap_admin;
pub use database::connect_and_migrate;
pub use sessions::{build_memory_session_layer, build_postgres_session_layer};
pub use state_builder::{IdentityBackends, build_app_state, build_identity_backends};
