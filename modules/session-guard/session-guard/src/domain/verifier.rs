//! Identity verification: token check plus a fresh account lookup.

use std::sync::Arc;
use std::time::Duration;

use session_guard_sdk::{Identity, IdentityProviderClient, VerifyError};

use super::deadline::with_deadline;

/// Resolves an access token into an [`Identity`].
///
/// The account record is looked up on every call so that disabling a user or
/// changing their roles takes effect immediately, not at token reissue.
#[derive(Clone)]
pub struct IdentityVerifier {
    provider: Arc<dyn IdentityProviderClient>,
    timeout: Duration,
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProviderClient>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Verify `access_token` and load the caller's current account state.
    ///
    /// The caller guarantees a non-empty token.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::TokenExpired`] when the token is past its expiry
    /// - [`VerifyError::TokenInvalid`] for bad, revoked, or orphaned tokens
    /// - [`VerifyError::Provider`] for outages and elapsed deadlines
    pub async fn verify(&self, access_token: &str) -> Result<Identity, VerifyError> {
        let token = with_deadline(
            "verify_token",
            self.timeout,
            self.provider.verify_token(access_token),
        )
        .await?;

        let account = with_deadline(
            "get_account",
            self.timeout,
            self.provider.get_account(&token.uid),
        )
        .await?;

        Ok(Identity::from_parts(token, account))
    }
}
