//! Plugin API trait for identity provider implementations.
//!
//! Plugins implement this trait to give the session guard access to token
//! verification, account lookup and refresh-token exchange. The guard wraps
//! every call in its own deadline and maps errors into its taxonomy.

use async_trait::async_trait;

use crate::error::IdentityProviderError;
use crate::models::{AccountRecord, RefreshedToken, VerifiedToken};

/// Plugin API trait for identity provider implementations.
///
/// Implementations must be safe for concurrent use: a single instance is
/// shared by every in-flight request.
#[async_trait]
pub trait IdentityProviderClient: Send + Sync {
    /// Verify an access token and decode its claims.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` if the token is well-formed but past its expiry
    /// - `TokenInvalid` if the signature, format, audience or issuer is wrong
    /// - `Unavailable` / `Internal` for transport and provider faults
    async fn verify_token(&self, access_token: &str)
    -> Result<VerifiedToken, IdentityProviderError>;

    /// Fetch the current account record for a user.
    ///
    /// # Errors
    ///
    /// - `TokenInvalid` if the account no longer exists
    /// - `Unavailable` / `Internal` for transport and provider faults
    async fn get_account(&self, uid: &str) -> Result<AccountRecord, IdentityProviderError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// - `RefreshRejected` if the provider declined the exchange
    /// - `Unavailable` / `Internal` for transport and provider faults
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, IdentityProviderError>;
}
