use session_guard_sdk::IdentityProviderError;
use thiserror::Error;

/// Errors raised by the Firebase plugin.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("plugin configuration error: {0}")]
    Config(String),

    #[error("service account key error: {0}")]
    Credentials(String),

    #[error("id token expired")]
    TokenExpired,

    #[error("invalid id token: {0}")]
    InvalidToken(String),

    #[error("no user record for uid '{0}'")]
    UserNotFound(String),

    #[error("refresh token rejected: {0}")]
    RefreshRejected(String),

    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },

    #[error("unexpected response from {endpoint}: {message}")]
    UnexpectedResponse {
        endpoint: &'static str,
        message: String,
    },
}

impl DomainError {
    pub(crate) fn transport(endpoint: &'static str, err: &reqwest::Error) -> Self {
        Self::Transport {
            endpoint,
            message: err.to_string(),
        }
    }

    pub(crate) fn unexpected(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            endpoint,
            message: message.into(),
        }
    }
}

impl From<DomainError> for IdentityProviderError {
    fn from(e: DomainError) -> Self {
        let msg = e.to_string();
        match e {
            DomainError::TokenExpired => Self::TokenExpired(msg),
            DomainError::InvalidToken(_) | DomainError::UserNotFound(_) => Self::TokenInvalid(msg),
            DomainError::RefreshRejected(reason) => Self::RefreshRejected(reason),
            DomainError::Transport { .. } => Self::Unavailable(msg),
            DomainError::Config(_)
            | DomainError::Credentials(_)
            | DomainError::UnexpectedResponse { .. } => Self::Internal(msg),
        }
    }
}
