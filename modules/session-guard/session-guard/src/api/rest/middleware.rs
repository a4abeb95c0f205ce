//! Cookie-session guard middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use session_guard_sdk::{
    AuthorizationOutcome, AuthorizationRequest, CredentialPair, SessionAuthorizer,
};

use super::cookie::rotated_access_cookie;
use super::error::GuardError;
use crate::config::RouteGuardConfig;

/// Shared state for one guarded group of routes.
#[derive(Clone)]
pub struct SessionGuardState {
    pub authorizer: Arc<dyn SessionAuthorizer>,
    pub guard: Arc<RouteGuardConfig>,
}

impl SessionGuardState {
    #[must_use]
    pub fn new(authorizer: Arc<dyn SessionAuthorizer>, guard: RouteGuardConfig) -> Self {
        Self {
            authorizer,
            guard: Arc::new(guard),
        }
    }
}

/// Authorize one request from its headers.
///
/// A guard without both cookie names yields [`AuthorizationOutcome::Failed`]
/// before any cookie is read and without calling the authorizer.
pub async fn authorize_headers(
    state: &SessionGuardState,
    headers: &HeaderMap,
) -> AuthorizationOutcome {
    let keys = match state.guard.token_keys() {
        Ok(keys) => keys,
        Err(cause) => return AuthorizationOutcome::Failed { cause },
    };

    let jar = CookieJar::from_headers(headers);
    let cookie_value = |name: &str| jar.get(name).map(|c| c.value().to_owned());
    let request = AuthorizationRequest::new(
        state.guard.allowed_roles.iter().cloned(),
        CredentialPair::new(cookie_value(keys.access), cookie_value(keys.refresh)),
    );

    state.authorizer.authorize(&request).await
}

/// Guard middleware, for use with `axum::middleware::from_fn_with_state`.
///
/// For each request:
/// 1. Checks both cookie names are configured (400 otherwise, cookies unread)
/// 2. Reads the access and refresh cookies; empty values count as absent
/// 3. Runs the authorizer
/// 4. On admit: inserts the `Identity` into extensions, runs the handler and
///    sets the rotated access cookie if there is one. Otherwise 401.
pub async fn session_guard_middleware(
    State(state): State<SessionGuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize_headers(&state, req.headers()).await {
        AuthorizationOutcome::Admitted {
            identity,
            rotated_access_token,
        } => {
            req.extensions_mut().insert(identity);
            let response = next.run(req).await;
            match (rotated_access_token, state.guard.token_keys()) {
                (Some(token), Ok(keys)) => {
                    let cookie = rotated_access_cookie(keys.access, &token);
                    (CookieJar::new().add(cookie), response).into_response()
                }
                _ => response,
            }
        }
        AuthorizationOutcome::Denied { reason, cause } => GuardError::Denied {
            reason,
            cause,
            expose_details: state.guard.expose_error_details,
        }
        .into_response(),
        AuthorizationOutcome::Failed { cause } => GuardError::from(cause).into_response(),
    }
}
