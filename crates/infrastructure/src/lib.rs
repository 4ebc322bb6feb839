//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod csv_spreadsheet_codec;
mod in_memory_audit_repository;
mod in_memory_claim_cache;
mod in_memory_identity_store;
mod in_memory_user_directory;
mod postgres_identity_store;
mod redis_claim_cache;
mod reset_token;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use csv_spreadsheet_codec::CsvSpreadsheetCodec;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_claim_cache::InMemoryClaimCache;
pub use in_memory_identity_store::{InMemoryIdentityStore, RoleDefinition};
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use postgres_identity_store::PostgresIdentityStore;
pub use redis_claim_cache::RedisClaimCache;
