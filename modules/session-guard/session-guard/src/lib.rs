//! Session Guard Module
//!
//! Cookie-session authentication for axum services. Each request's access
//! token is verified through an identity provider plugin; an expired token is
//! silently refreshed once, and the caller's roles are checked against the
//! route's allowed roles.
//!
//! ```ignore
//! let service = Arc::new(Service::new(provider, &SessionGuardConfig::default()));
//! let state = SessionGuardState::new(service, RouteGuardConfig::new("session", "refresh"));
//! let router = Router::new()
//!     .route("/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(state, session_guard_middleware));
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;

pub use api::rest::{
    AuthenticatedIdentity, ErrorBody, GuardError, SessionGuardState, authorize_headers,
    session_guard_middleware,
};
pub use config::{RouteGuardConfig, SessionGuardConfig};
pub use domain::Service;
