//! Configuration for the session guard.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use session_guard_sdk::ConfigurationError;

fn default_provider_timeout_ms() -> u64 {
    5_000
}

/// Module-level configuration shared by every route guard.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionGuardConfig {
    /// Upper bound for a single identity provider call, in milliseconds.
    /// An elapsed deadline is reported as a provider error.
    pub provider_timeout_ms: u64,
}

impl Default for SessionGuardConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: default_provider_timeout_ms(),
        }
    }
}

impl SessionGuardConfig {
    #[must_use]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms.max(1))
    }
}

/// Per-route guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteGuardConfig {
    /// Roles admitted on the route. Empty admits any authenticated user.
    pub allowed_roles: Vec<String>,

    /// Cookie carrying the access token. Required.
    pub access_token_key: Option<String>,

    /// Cookie carrying the refresh token. Required.
    pub refresh_token_key: Option<String>,

    /// Include the diagnostic cause in the `error` field of deny bodies.
    pub expose_error_details: bool,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            allowed_roles: Vec::new(),
            access_token_key: None,
            refresh_token_key: None,
            expose_error_details: true,
        }
    }
}

/// Cookie names resolved from a valid [`RouteGuardConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenKeys<'a> {
    pub access: &'a str,
    pub refresh: &'a str,
}

impl RouteGuardConfig {
    #[must_use]
    pub fn new(access_token_key: impl Into<String>, refresh_token_key: impl Into<String>) -> Self {
        Self {
            access_token_key: Some(access_token_key.into()),
            refresh_token_key: Some(refresh_token_key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve both cookie names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] naming every key that is absent or empty.
    pub fn token_keys(&self) -> Result<TokenKeys<'_>, ConfigurationError> {
        let access = non_empty(self.access_token_key.as_deref());
        let refresh = non_empty(self.refresh_token_key.as_deref());

        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(TokenKeys { access, refresh }),
            _ => {
                let mut missing = Vec::with_capacity(2);
                if access.is_none() {
                    missing.push("access_token_key");
                }
                if refresh.is_none() {
                    missing.push("refresh_token_key");
                }
                Err(ConfigurationError::new(missing))
            }
        }
    }

    /// Startup check; same rule the middleware applies per request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if either cookie key is missing.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.token_keys().map(|_| ())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
