//! Configuration for the Firebase identity provider plugin.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirebaseIdpPluginConfig {
    /// Firebase project. Defaults to the service account's `project_id`.
    pub project_id: Option<String>,

    /// Web API key used for refresh-token exchange.
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Service-account key file (JSON). Required.
    pub service_account_path: Option<PathBuf>,

    pub jwks_url: String,
    pub identity_toolkit_url: String,
    pub secure_token_url: String,

    /// Per-request HTTP timeout, in milliseconds.
    pub request_timeout_ms: u64,

    /// How long fetched signing keys are trusted, in seconds.
    pub jwks_cache_ttl_secs: u64,

    /// Minimum age of the cached key set before an unknown `kid` may trigger
    /// a refetch, in seconds.
    pub jwks_min_refetch_secs: u64,
}

impl Default for FirebaseIdpPluginConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            service_account_path: None,
            jwks_url: DEFAULT_JWKS_URL.to_owned(),
            identity_toolkit_url: DEFAULT_IDENTITY_TOOLKIT_URL.to_owned(),
            secure_token_url: DEFAULT_SECURE_TOKEN_URL.to_owned(),
            request_timeout_ms: 10_000,
            jwks_cache_ttl_secs: 3_600,
            jwks_min_refetch_secs: 60,
        }
    }
}

impl FirebaseIdpPluginConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    #[must_use]
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    #[must_use]
    pub fn jwks_min_refetch(&self) -> Duration {
        Duration::from_secs(self.jwks_min_refetch_secs)
    }
}
