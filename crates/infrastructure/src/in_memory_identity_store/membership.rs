use super::*;

impl InMemoryIdentityStore {
    pub(super) async fn add_to_roles_impl(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;

        let mut errors: Vec<String> = roles
            .iter()
            .filter(|role| !state.roles.contains_key(role.as_str()))
            .map(|role| format!("Role '{role}' does not exist."))
            .collect();

        let Some(stored) = state.accounts.get_mut(&user_id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        };

        errors.extend(
            roles
                .iter()
                .filter(|role| stored.account.roles.contains(role))
                .map(|role| format!("User already in role '{role}'.")),
        );
        if !errors.is_empty() {
            return Ok(IdentityResult::Failed(errors));
        }

        stored.account.roles.extend(roles.iter().cloned());
        stored.account.roles.sort();
        stored.account.roles.dedup();
        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn remove_from_roles_impl(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;
        let Some(stored) = state.accounts.get_mut(&user_id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        };

        let errors: Vec<String> = roles
            .iter()
            .filter(|role| !stored.account.roles.contains(role))
            .map(|role| format!("User is not in role '{role}'."))
            .collect();
        if !errors.is_empty() {
            return Ok(IdentityResult::Failed(errors));
        }

        stored.account.roles.retain(|role| !roles.contains(role));
        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn add_claim_impl(
        &self,
        user_id: UserId,
        claim: &Claim,
    ) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;
        let Some(stored) = state.accounts.get_mut(&user_id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        };

        if stored.claims.contains(claim) {
            return Ok(IdentityResult::failed(format!(
                "Claim '{}' is already assigned.",
                claim.value()
            )));
        }

        stored.claims.push(claim.clone());
        Ok(IdentityResult::Succeeded(()))
    }

    pub(super) async fn remove_claim_impl(
        &self,
        user_id: UserId,
        claim: &Claim,
    ) -> AppResult<IdentityResult> {
        let mut state = self.state.write().await;
        let Some(stored) = state.accounts.get_mut(&user_id) else {
            return Ok(IdentityResult::failed(format!(
                "User '{user_id}' does not exist."
            )));
        };

        stored.claims.retain(|stored_claim| stored_claim != claim);
        Ok(IdentityResult::Succeeded(()))
    }
}
