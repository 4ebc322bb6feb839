use super::*;

impl InMemoryIdentityStore {
    pub(super) async fn create_user_impl(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>> {
        let password_hash = password
            .map(|password| self.password_hasher.hash_password(password))
            .transpose()?;

        let mut state = self.state.write().await;
        if state.user_name_taken(&account.user_name, None) {
            return Ok(IdentityResult::failed(format!(
                "User name '{}' is already taken.",
                account.user_name
            )));
        }

        let id = UserId::new();
        state.accounts.insert(
            id,
            StoredAccount {
                account: UserAccount {
                    id,
                    user_name: account.user_name,
                    display_name: account.display_name,
                    email: account.email,
                    phone_number: account.phone_number,
                    profile_picture_url: account.profile_picture_url,
                    tenant_id: account.tenant_id,
                    tenant_name: account.tenant_name,
                    superior_id: account.superior_id,
                    provider: account.provider,
                    is_active: account.is_active,
                    roles: Vec::new(),
                },
                claims: Vec::new(),
                password_hash,
            },
        );

        Ok(IdentityResult::Succeeded(id))
    }

    pub(super) async fn update_user_impl(
        &self,
        account: &UserAccount,
    ) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;
        if state.user_name_taken(&account.user_name, Some(account.id)) {
            return Ok(IdentityResult::failed(format!(
                "User name '{}' is already taken.",
                account.user_name
            )));
        }

        let Some(stored) = state.accounts.get_mut(&account.id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{}' does not exist.",
                account.id
            )));
        };

        let roles = std::mem::take(&mut stored.account.roles);
        stored.account = UserAccount {
            roles,
            ..account.clone()
        };

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;
        if state.accounts.remove(&user_id).is_none() {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        }

        state.reset_tokens.remove(&user_id);
        for stored in state.accounts.values_mut() {
            if stored.account.superior_id == Some(user_id) {
                stored.account.superior_id = None;
            }
        }

        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn query_users_impl(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Vec<UserAccount>> {
        let state = self.state.read().await;
        let mut matching: Vec<&UserAccount> = state
            .accounts
            .values()
            .map(|stored| &stored.account)
            .filter(|account| filter.matches(account))
            .collect();
        matching.sort_by(|left, right| page.sort.compare(left, right));

        Ok(matching
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .cloned()
            .collect())
    }
}
