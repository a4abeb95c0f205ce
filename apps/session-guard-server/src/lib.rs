//! Demo server wiring the session guard in front of a few routes.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use session_guard::Service;
use session_guard_sdk::{IdentityProviderClient, SessionAuthorizer};

pub mod config;
pub mod routes;

use config::{AppConfig, ProviderKind};

/// Build the configured identity provider and the authorizer on top of it.
///
/// # Errors
///
/// Fails when the Firebase plugin cannot load its credentials.
pub fn build_authorizer(cfg: &AppConfig) -> anyhow::Result<Arc<dyn SessionAuthorizer>> {
    let provider: Arc<dyn IdentityProviderClient> = match cfg.provider.kind {
        ProviderKind::Firebase => firebase_idp_plugin::init(&cfg.provider.firebase)?,
        ProviderKind::Static => static_idp_plugin::init(&cfg.provider.static_),
    };
    Ok(Arc::new(Service::new(provider, &cfg.session_guard)))
}
