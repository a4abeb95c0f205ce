//! Public API trait for the session guard.
//!
//! This trait defines the interface that transports use to decide whether an
//! inbound request proceeds. The `session_guard` crate implements it on top of
//! an [`IdentityProviderClient`](crate::IdentityProviderClient) plugin.

use async_trait::async_trait;

use crate::models::{AuthorizationOutcome, AuthorizationRequest};

/// Public API trait for the session guard.
///
/// ```ignore
/// let outcome = authorizer.authorize(&request).await;
/// if let Some(token) = outcome.rotated_access_token() {
///     // persist the rotated token, e.g. rewrite the access cookie
/// }
/// ```
///
/// Every call is an independent unit of work: implementations keep no
/// per-request state between calls, so the same request against deterministic
/// provider responses always yields the same outcome.
#[async_trait]
pub trait SessionAuthorizer: Send + Sync {
    /// Run the verify / refresh / re-verify / authorize pipeline for one request.
    ///
    /// Never fails: provider errors are folded into
    /// [`AuthorizationOutcome::Denied`] with the original cause attached.
    async fn authorize(&self, request: &AuthorizationRequest) -> AuthorizationOutcome;
}
