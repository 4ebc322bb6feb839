mod account;
mod query;
mod store;
mod tenant;

pub use account::{NewUserAccount, UserAccount};
pub use query::{MatchMode, PageRequest, SortDirection, UserFilter, UserSort, UserSortField};
pub use store::{IdentityResult, IdentityStore, PasswordHasher};
pub use tenant::{TenantDirectory, TenantSummary};
