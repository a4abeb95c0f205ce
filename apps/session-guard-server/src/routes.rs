//! HTTP routes of the demo server.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};
use session_guard::{AuthenticatedIdentity, SessionGuardState, session_guard_middleware};
use session_guard_sdk::SessionAuthorizer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub roles: Vec<String>,
    pub custom_claims: Map<String, Value>,
}

#[allow(clippy::unused_async)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[allow(clippy::unused_async)]
async fn me(AuthenticatedIdentity(identity): AuthenticatedIdentity) -> Json<MeResponse> {
    Json(MeResponse {
        uid: identity.uid().to_owned(),
        roles: identity.roles().iter().cloned().collect(),
        custom_claims: identity.custom_claims().clone(),
    })
}

#[allow(clippy::unused_async)]
async fn admin(AuthenticatedIdentity(identity): AuthenticatedIdentity) -> Json<Value> {
    Json(serde_json::json!({ "uid": identity.uid(), "admin": true }))
}

/// Build the router: `/health` is public, `/v1/me` needs any session and
/// `/v1/admin` needs one of `admin_roles`.
#[must_use]
pub fn build_router(authorizer: &Arc<dyn SessionAuthorizer>, cfg: &AppConfig) -> Router {
    let any_user = SessionGuardState::new(Arc::clone(authorizer), cfg.guard.clone());
    let admins = SessionGuardState::new(
        Arc::clone(authorizer),
        cfg.guard
            .clone()
            .with_allowed_roles(cfg.admin_roles.iter().cloned()),
    );

    let me_routes = Router::new()
        .route("/v1/me", get(me))
        .layer(axum::middleware::from_fn_with_state(
            any_user,
            session_guard_middleware,
        ));
    let admin_routes = Router::new()
        .route("/v1/admin", get(admin))
        .layer(axum::middleware::from_fn_with_state(
            admins,
            session_guard_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(me_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
}
