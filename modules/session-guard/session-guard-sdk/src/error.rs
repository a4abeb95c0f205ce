//! Error types for the session guard.

use thiserror::Error;

/// Errors reported by an identity provider plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityProviderError {
    /// The token is well-formed but no longer valid in time.
    #[error("token expired: {0}")]
    TokenExpired(String),

    /// The token is malformed, badly signed, revoked, or names an unknown user.
    #[error("token invalid: {0}")]
    TokenInvalid(String),

    /// The provider declined a refresh-token exchange.
    #[error("refresh rejected: {0}")]
    RefreshRejected(String),

    /// The provider could not be reached or did not answer in time.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with something unexpected.
    #[error("provider internal error: {0}")]
    Internal(String),
}

/// Failure of the identity verification step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Signature, format or revocation failure. Not recoverable by refresh.
    #[error("token invalid: {0}")]
    TokenInvalid(String),

    /// Time-based invalidity. The only failure a refresh can recover from.
    #[error("token expired: {0}")]
    TokenExpired(String),

    /// Transport or provider outage, including an exceeded deadline.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl From<IdentityProviderError> for VerifyError {
    fn from(e: IdentityProviderError) -> Self {
        match e {
            IdentityProviderError::TokenExpired(msg) => Self::TokenExpired(msg),
            IdentityProviderError::TokenInvalid(msg)
            | IdentityProviderError::RefreshRejected(msg) => Self::TokenInvalid(msg),
            IdentityProviderError::Unavailable(msg) | IdentityProviderError::Internal(msg) => {
                Self::Provider(msg)
            }
        }
    }
}

/// Failure of the token refresh step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The provider declined the refresh token (revoked, expired, unknown).
    #[error("refresh rejected: {0}")]
    Rejected(String),

    /// Transport failure, timeout, or malformed provider answer.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl From<IdentityProviderError> for RefreshError {
    fn from(e: IdentityProviderError) -> Self {
        match e {
            IdentityProviderError::RefreshRejected(msg)
            | IdentityProviderError::TokenInvalid(msg)
            | IdentityProviderError::TokenExpired(msg) => Self::Rejected(msg),
            IdentityProviderError::Unavailable(msg) | IdentityProviderError::Internal(msg) => {
                Self::Provider(msg)
            }
        }
    }
}

/// Diagnostic cause attached to a denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// Deployment fault: a route guard is missing one or both cookie keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing session guard configuration: {}", .missing.join(", "))]
pub struct ConfigurationError {
    missing: Vec<&'static str>,
}

impl ConfigurationError {
    #[must_use]
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }

    /// Names of the configuration keys that were absent or empty.
    #[must_use]
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}
