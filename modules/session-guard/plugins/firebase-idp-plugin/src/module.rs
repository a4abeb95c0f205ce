//! Firebase identity provider plugin construction.

use std::sync::Arc;

use session_guard_sdk::IdentityProviderClient;
use tracing::info;

use crate::config::FirebaseIdpPluginConfig;
use crate::domain::{DomainError, Service, ServiceAccountKey};

/// Load the service-account key and build the plugin client.
///
/// Reads the key file synchronously; call once at startup.
///
/// # Errors
///
/// Any [`DomainError`] here is fatal for the process: a missing key path,
/// an unreadable or malformed key file, or a missing API key.
pub fn init(cfg: &FirebaseIdpPluginConfig) -> Result<Arc<dyn IdentityProviderClient>, DomainError> {
    info!("Initializing firebase_idp_plugin");

    let path = cfg
        .service_account_path
        .as_deref()
        .ok_or_else(|| DomainError::Config("service_account_path is required".to_owned()))?;
    let key = ServiceAccountKey::load(path)?;
    let service = Service::new(cfg, &key)?;

    info!(
        project_id = service.project_id(),
        client_email = %key.client_email,
        jwks_cache_ttl_secs = cfg.jwks_cache_ttl_secs,
        "Firebase identity provider initialized"
    );
    Ok(Arc::new(service))
}
