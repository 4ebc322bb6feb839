use super::UserAccount;

/// How search text is compared against account fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Both sides are lower-cased before the substring test.
    #[default]
    CaseInsensitive,
    /// Plain substring containment.
    CaseSensitive,
}

/// Filter predicate shared by listing, counting and export queries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    /// Substring matched against user name, email, display name, phone,
    /// tenant name and provider. Empty matches every account.
    pub search: String,
    /// Restricts results to members of this role.
    pub role: Option<String>,
    /// Comparison mode for `search`.
    pub match_mode: MatchMode,
}

impl UserFilter {
    /// Returns whether the account satisfies the predicate.
    ///
    /// Store adapters that cannot push the predicate down evaluate this
    /// directly; SQL adapters mirror it.
    #[must_use]
    pub fn matches(&self, account: &UserAccount) -> bool {
        if let Some(role) = self.role.as_deref()
            && !account.roles.iter().any(|member_of| member_of == role)
        {
            return false;
        }

        let needle = match self.match_mode {
            MatchMode::CaseInsensitive => self.search.to_lowercase(),
            MatchMode::CaseSensitive => self.search.clone(),
        };

        let haystacks = [
            Some(account.user_name.as_str()),
            account.email.as_deref(),
            account.display_name.as_deref(),
            account.phone_number.as_deref(),
            account.tenant_name.as_deref(),
            Some(account.provider.as_str()),
        ];

        haystacks.into_iter().flatten().any(|field| match self.match_mode {
            MatchMode::CaseInsensitive => field.to_lowercase().contains(needle.as_str()),
            MatchMode::CaseSensitive => field.contains(needle.as_str()),
        })
    }
}

/// Sortable account columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortField {
    /// Sort by login name.
    #[default]
    UserName,
    /// Sort by display name.
    DisplayName,
    /// Sort by email address.
    Email,
    /// Sort by tenant name.
    TenantName,
    /// Sort by provider.
    Provider,
    /// Sort by active flag.
    IsActive,
}

impl UserSortField {
    /// Parses a transport value such as `user_name`.
    pub fn parse(value: &str) -> steward_core::AppResult<Self> {
        match value {
            "user_name" => Ok(Self::UserName),
            "display_name" => Ok(Self::DisplayName),
            "email" => Ok(Self::Email),
            "tenant_name" => Ok(Self::TenantName),
            "provider" => Ok(Self::Provider),
            "is_active" => Ok(Self::IsActive),
            _ => Err(steward_core::AppError::Validation(format!(
                "unknown sort field '{value}'"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering of account pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSort {
    /// Column to sort by.
    pub field: UserSortField,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl UserSort {
    /// Orders two accounts by the selected column and direction.
    ///
    /// Ties are broken by user id so pages are stable.
    #[must_use]
    pub fn compare(&self, left: &UserAccount, right: &UserAccount) -> std::cmp::Ordering {
        let ordering = match self.field {
            UserSortField::UserName => left
                .user_name
                .to_lowercase()
                .cmp(&right.user_name.to_lowercase()),
            UserSortField::DisplayName => left.display_name.cmp(&right.display_name),
            UserSortField::Email => left.email.cmp(&right.email),
            UserSortField::TenantName => left.tenant_name.cmp(&right.tenant_name),
            UserSortField::Provider => left.provider.cmp(&right.provider),
            UserSortField::IsActive => left.is_active.cmp(&right.is_active),
        };

        let ordering = match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };

        ordering.then_with(|| left.id.cmp(&right.id))
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,
    /// Maximum rows on the page.
    pub page_size: usize,
    /// Ordering applied before paging.
    pub sort: UserSort,
}

impl PageRequest {
    /// Number of rows skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }
}
