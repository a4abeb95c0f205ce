#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Identity Provider Plugin
//!
//! Serves accounts and tokens from configuration. Intended for local
//! development and end-to-end tests of routes behind the session guard.
//!
//! ## Configuration
//!
//! ```yaml
//! provider:
//!   kind: static
//!   static:
//!     accounts:
//!       - uid: "alice"
//!         roles: ["admin"]
//!       - uid: "mallory"
//!         disabled: true
//!     tokens:
//!       - token: "alice-session"
//!         uid: "alice"
//!       - token: "alice-stale"
//!         uid: "alice"
//!         expired: true
//!     refresh_tokens:
//!       - refresh_token: "alice-refresh"
//!         access_token: "alice-session"
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::StaticIdpPluginConfig;
pub use domain::Service;
pub use module::init;
