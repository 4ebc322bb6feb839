use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use steward_application::{BootstrapAdmin, DEFAULT_CLAIM_CACHE_TTL_SECONDS};
use steward_core::AppError;
use tracing_subscriber::EnvFilter;

/// Where accounts, roles and claims are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

impl StoreBackend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

/// Where claim lists are cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis { redis_url: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub store_backend: StoreBackend,
    pub cache_backend: CacheBackend,
    pub claim_cache_ttl_seconds: u32,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        if migrate_only && store_backend == StoreBackend::Memory {
            return Err(AppError::Validation(
                "the migrate command requires STORE_BACKEND=postgres".to_owned(),
            ));
        }

        let cache_backend = match env::var("CACHE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => CacheBackend::Memory,
            "redis" => CacheBackend::Redis {
                redis_url: required_non_empty_env("REDIS_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "CACHE_BACKEND must be either 'memory' or 'redis', got '{other}'"
                )));
            }
        };

        let claim_cache_ttl_seconds = match env::var("CLAIM_CACHE_TTL_SECONDS") {
            Ok(value) => value.trim().parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid CLAIM_CACHE_TTL_SECONDS: {error}"))
            })?,
            Err(_) => DEFAULT_CLAIM_CACHE_TTL_SECONDS,
        };

        let bootstrap_admin = env::var("BOOTSTRAP_ADMIN_PASSWORD")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|password| BootstrapAdmin {
                tenant_name: env::var("BOOTSTRAP_TENANT_NAME")
                    .unwrap_or_else(|_| "Default".to_owned()),
                user_name: env::var("BOOTSTRAP_ADMIN_USER_NAME")
                    .unwrap_or_else(|_| "admin".to_owned()),
                password,
                email: None,
            });

        Ok(Self {
            migrate_only,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            store_backend,
            cache_backend,
            claim_cache_ttl_seconds,
            bootstrap_admin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
