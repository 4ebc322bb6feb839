use crate::{MatchMode, PageRequest, UserFilter};

use super::*;

impl UserAdminService {
    /// Returns one page of accounts plus the total under the same filter.
    ///
    /// Plain listing needs `Users.View`; non-empty search text also needs
    /// `Users.Search`. Page and count are separate store queries over one
    /// predicate and are not snapshot-consistent under concurrent writes.
    pub async fn list_users(
        &self,
        actor: &UserIdentity,
        query: UserListQuery,
    ) -> AppResult<UserPage> {
        self.authorization_service
            .require_permission(actor, Permission::UsersView)
            .await?;

        let search = query.search.trim().to_lowercase();
        if !search.is_empty() {
            self.authorization_service
                .require_permission(actor, Permission::UsersSearch)
                .await?;
        }

        let filter = UserFilter {
            search,
            role: non_blank(query.role.as_deref()),
            match_mode: MatchMode::CaseInsensitive,
        };

        let page_size = match query.page_size {
            0 => DEFAULT_PAGE_SIZE,
            requested => requested.min(MAX_PAGE_SIZE),
        };
        let page_request = PageRequest {
            page: query.page,
            page_size,
            sort: query.sort,
        };

        let mut items = self
            .identity_store
            .query_users(&filter, page_request)
            .await?;
        items.truncate(page_size);
        let total = self.identity_store.count_users(&filter).await?;

        Ok(UserPage {
            items,
            total,
            page: query.page,
            page_size,
        })
    }
}
