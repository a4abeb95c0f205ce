//! Session Guard SDK
//!
//! This crate provides the public API for the `session_guard` module:
//!
//! - [`SessionAuthorizer`] - Public API trait for consumers (middleware, other transports)
//! - [`IdentityProviderClient`] - Plugin API trait for identity provider implementations
//! - [`AuthorizationRequest`] / [`AuthorizationOutcome`] - Per-request decision models
//! - [`Identity`] - Caller identity resolved for one request
//! - Error taxonomy ([`IdentityProviderError`], [`VerifyError`], [`RefreshError`],
//!   [`ConfigurationError`])
//!
//! ## Usage
//!
//! ```ignore
//! use session_guard_sdk::{AuthorizationRequest, CredentialPair, SessionAuthorizer};
//!
//! let request = AuthorizationRequest::new(
//!     ["admin".to_owned()],
//!     CredentialPair::new(Some(access_cookie), Some(refresh_cookie)),
//! );
//! match authorizer.authorize(&request).await {
//!     AuthorizationOutcome::Admitted { identity, rotated_access_token } => { /* ... */ }
//!     AuthorizationOutcome::Denied { reason, cause } => { /* ... */ }
//!     AuthorizationOutcome::Failed { cause } => { /* ... */ }
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::SessionAuthorizer;
pub use error::{
    AuthFailure, ConfigurationError, IdentityProviderError, RefreshError, VerifyError,
};
pub use models::{
    AccountRecord, AuthorizationOutcome, AuthorizationRequest, CredentialPair, DenyReason,
    Identity, RefreshedToken, VerifiedToken,
};
pub use plugin_api::IdentityProviderClient;
