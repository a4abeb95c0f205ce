use session_guard_sdk::IdentityProviderError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown access token")]
    UnknownToken,

    #[error("access token expired")]
    Expired,

    #[error("no account with uid '{0}'")]
    UnknownAccount(String),

    #[error("unknown refresh token")]
    UnknownRefreshToken,
}

impl From<DomainError> for IdentityProviderError {
    fn from(e: DomainError) -> Self {
        let msg = e.to_string();
        match e {
            DomainError::Expired => Self::TokenExpired(msg),
            DomainError::UnknownToken | DomainError::UnknownAccount(_) => Self::TokenInvalid(msg),
            DomainError::UnknownRefreshToken => Self::RefreshRejected(msg),
        }
    }
}
