use steward_application::{MatchMode, SortDirection, UserSortField};

use super::*;

/// Fields searched by the listing predicate, mirroring `UserFilter::matches`.
const SEARCHED_COLUMNS: [&str; 6] = [
    "u.user_name",
    "u.email",
    "u.display_name",
    "u.phone_number",
    "u.tenant_name",
    "u.provider",
];

fn where_clause(match_mode: MatchMode) -> String {
    let search = SEARCHED_COLUMNS
        .iter()
        .map(|column| match match_mode {
            MatchMode::CaseInsensitive => {
                format!("STRPOS(LOWER(COALESCE({column}, '')), LOWER($1)) > 0")
            }
            MatchMode::CaseSensitive => format!("STRPOS(COALESCE({column}, ''), $1) > 0"),
        })
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        r#"
        WHERE ($1 = '' OR {search})
            AND (
                $2::TEXT IS NULL
                OR EXISTS (
                    SELECT 1 FROM user_roles r WHERE r.user_id = u.id AND r.role_name = $2
                )
            )
        "#
    )
}

fn order_clause(page: &PageRequest) -> String {
    let column = match page.sort.field {
        UserSortField::UserName => "LOWER(u.user_name)",
        UserSortField::DisplayName => "u.display_name",
        UserSortField::Email => "u.email",
        UserSortField::TenantName => "u.tenant_name",
        UserSortField::Provider => "u.provider",
        UserSortField::IsActive => "u.is_active",
    };
    let direction = match page.sort.direction {
        SortDirection::Ascending => "ASC NULLS FIRST",
        SortDirection::Descending => "DESC NULLS LAST",
    };

    format!("ORDER BY {column} {direction}, u.id")
}

impl PostgresIdentityStore {
    pub(super) async fn query_users_impl(
        &self,
        filter: &UserFilter,
        page: Option<PageRequest>,
    ) -> AppResult<Vec<UserAccount>> {
        let page = page.unwrap_or(PageRequest {
            page: 0,
            page_size: usize::MAX,
            sort: Default::default(),
        });
        let limit = i64::try_from(page.page_size).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM user_accounts u {} {} LIMIT $3 OFFSET $4",
            where_clause(filter.match_mode),
            order_clause(&page)
        );

        let rows = sqlx::query_as::<_, UserAccountRow>(&sql)
            .bind(filter.search.as_str())
            .bind(filter.role.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(internal("query user accounts"))?;

        Ok(rows.into_iter().map(UserAccount::from).collect())
    }

    pub(super) async fn count_users_impl(&self, filter: &UserFilter) -> AppResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM user_accounts u {}",
            where_clause(filter.match_mode)
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.search.as_str())
            .bind(filter.role.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(internal("count user accounts"))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
