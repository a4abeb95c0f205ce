//! Static identity provider plugin construction.

use std::sync::Arc;

use session_guard_sdk::IdentityProviderClient;
use tracing::info;

use crate::config::StaticIdpPluginConfig;
use crate::domain::Service;

/// Build the plugin client from configuration.
#[must_use]
pub fn init(cfg: &StaticIdpPluginConfig) -> Arc<dyn IdentityProviderClient> {
    info!("Initializing static_idp_plugin");
    tracing::warn!(
        "Static identity provider is active: accounts and tokens come from configuration. \
         Do NOT use this provider in production."
    );

    info!(
        account_count = cfg.accounts.len(),
        token_count = cfg.tokens.len(),
        refresh_token_count = cfg.refresh_tokens.len(),
        "Loaded plugin configuration"
    );

    Arc::new(Service::from_config(cfg))
}
