//! Client implementation for the Firebase identity provider plugin.
//!
//! Implements `IdentityProviderClient` using the domain service.

use async_trait::async_trait;
use session_guard_sdk::{
    AccountRecord, IdentityProviderClient, IdentityProviderError, RefreshedToken, VerifiedToken,
};

use super::service::Service;

#[async_trait]
impl IdentityProviderClient for Service {
    async fn verify_token(&self, access_token: &str) -> Result<VerifiedToken, IdentityProviderError> {
        self.verify(access_token).await.map_err(Into::into)
    }

    async fn get_account(&self, uid: &str) -> Result<AccountRecord, IdentityProviderError> {
        self.account(uid).await.map_err(Into::into)
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, IdentityProviderError> {
        let access_token = self.refresh(refresh_token).await?;
        Ok(RefreshedToken { access_token })
    }
}
