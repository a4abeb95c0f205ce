//! Client implementation for the static identity provider plugin.
//!
//! Implements `IdentityProviderClient` using the domain service.

use async_trait::async_trait;
use secrecy::SecretString;
use session_guard_sdk::{
    AccountRecord, IdentityProviderClient, IdentityProviderError, RefreshedToken, VerifiedToken,
};

use super::service::Service;

#[async_trait]
impl IdentityProviderClient for Service {
    async fn verify_token(&self, access_token: &str) -> Result<VerifiedToken, IdentityProviderError> {
        self.verify(access_token).map_err(Into::into)
    }

    async fn get_account(&self, uid: &str) -> Result<AccountRecord, IdentityProviderError> {
        self.account(uid).map_err(Into::into)
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, IdentityProviderError> {
        let access_token = self.refresh(refresh_token)?;
        Ok(RefreshedToken {
            access_token: SecretString::from(access_token.to_owned()),
        })
    }
}
