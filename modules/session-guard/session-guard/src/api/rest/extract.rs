use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use session_guard_sdk::Identity;

use super::error::GuardError;

/// Extractor for the [`Identity`] admitted by the session guard middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedIdentity)
            .ok_or(GuardError::MissingIdentity)
    }
}
