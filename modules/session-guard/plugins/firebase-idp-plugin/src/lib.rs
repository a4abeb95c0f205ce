#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Firebase Identity Provider Plugin
//!
//! Implements `IdentityProviderClient` over the Firebase Authentication REST
//! surface:
//!
//! - ID tokens are verified locally (RS256) against the securetoken JWKS
//! - Account state comes from `accounts:lookup`, authorized with a
//!   service-account access token
//! - Refresh tokens are exchanged at the securetoken `v1/token` endpoint
//!
//! ## Configuration
//!
//! ```yaml
//! provider:
//!   kind: firebase
//!   firebase:
//!     api_key: "AIza..."
//!     service_account_path: "/etc/session-guard/service-account.json"
//!     # project_id defaults to the service account's project
//!     request_timeout_ms: 10000
//!     jwks_cache_ttl_secs: 3600
//!     jwks_min_refetch_secs: 60
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::FirebaseIdpPluginConfig;
pub use domain::{DomainError, Service};
pub use module::init;
