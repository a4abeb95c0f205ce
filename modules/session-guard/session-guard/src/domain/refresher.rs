//! Refresh-token exchange.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use session_guard_sdk::{IdentityProviderClient, RefreshError};

use super::deadline::with_deadline;

/// Exchanges a refresh token for a new access token.
///
/// One attempt per call; never retried. Stored session state is not touched.
#[derive(Clone)]
pub struct TokenRefresher {
    provider: Arc<dyn IdentityProviderClient>,
    timeout: Duration,
}

impl TokenRefresher {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProviderClient>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Exchange `refresh_token` for a new access token.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::Rejected`] for an empty token (no network call) or a
    ///   declined exchange
    /// - [`RefreshError::Provider`] for transport faults, elapsed deadlines,
    ///   and empty access tokens in a success answer
    pub async fn refresh(&self, refresh_token: &str) -> Result<SecretString, RefreshError> {
        if refresh_token.is_empty() {
            return Err(RefreshError::Rejected("refresh token is empty".to_owned()));
        }

        let refreshed = with_deadline(
            "exchange_refresh_token",
            self.timeout,
            self.provider.exchange_refresh_token(refresh_token),
        )
        .await?;

        if refreshed.access_token.expose_secret().is_empty() {
            return Err(RefreshError::Provider(
                "token endpoint returned an empty access token".to_owned(),
            ));
        }

        Ok(refreshed.access_token)
    }
}
