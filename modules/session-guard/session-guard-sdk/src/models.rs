//! Domain models for the session guard.

use std::collections::BTreeSet;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AuthFailure, ConfigurationError};

/// Custom claim that carries the caller's roles.
pub const ROLES_CLAIM: &str = "roles";

/// Access and refresh credentials read from the transport.
///
/// Both values are opaque. Empty strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct CredentialPair {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
}

impl CredentialPair {
    #[must_use]
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: non_empty_secret(access_token),
            refresh_token: non_empty_secret(refresh_token),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }
}

fn non_empty_secret(value: Option<String>) -> Option<SecretString> {
    value.filter(|v| !v.is_empty()).map(SecretString::from)
}

/// Input of one authorization run. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationRequest {
    /// Roles admitted on this route. Empty means any authenticated user.
    pub allowed_roles: BTreeSet<String>,
    pub credentials: CredentialPair,
}

impl AuthorizationRequest {
    #[must_use]
    pub fn new(
        allowed_roles: impl IntoIterator<Item = String>,
        credentials: CredentialPair,
    ) -> Self {
        Self {
            allowed_roles: allowed_roles.into_iter().collect(),
            credentials,
        }
    }
}

/// Result of a successful `verify_token` call.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub uid: String,
    /// Decoded token claims.
    pub claims: Map<String, Value>,
}

/// Current account state returned by `get_account`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountRecord {
    pub disabled: bool,
    pub custom_claims: Map<String, Value>,
}

/// Result of a successful refresh-token exchange.
#[derive(Debug, Clone)]
pub struct RefreshedToken {
    pub access_token: SecretString,
}

/// Caller identity resolved for exactly one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    uid: String,
    disabled: bool,
    roles: BTreeSet<String>,
    claims: Map<String, Value>,
    custom_claims: Map<String, Value>,
}

impl Identity {
    /// Combine a verified token with the freshly looked-up account record.
    ///
    /// Roles come from the account's `roles` custom claim. A missing or
    /// non-array claim yields no roles; non-string entries are skipped.
    #[must_use]
    pub fn from_parts(token: VerifiedToken, account: AccountRecord) -> Self {
        let roles = roles_from_claims(&account.custom_claims);
        Self {
            uid: token.uid,
            disabled: account.disabled,
            roles,
            claims: token.claims,
            custom_claims: account.custom_claims,
        }
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Decoded token claims.
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Custom claims from the account record.
    #[must_use]
    pub fn custom_claims(&self) -> &Map<String, Value> {
        &self.custom_claims
    }
}

fn roles_from_claims(custom_claims: &Map<String, Value>) -> BTreeSet<String> {
    custom_claims
        .get(ROLES_CLAIM)
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    AccountDisabled,
    Unauthorized,
    AccessDenied,
}

impl DenyReason {
    /// Fixed client-facing message for this reason.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::AccountDisabled => "Account disabled",
            Self::Unauthorized => "Unauthorized role",
            Self::AccessDenied => "Access denied",
        }
    }
}

/// Terminal outcome of one authorization run.
#[derive(Debug, Clone)]
pub enum AuthorizationOutcome {
    /// The request proceeds. `rotated_access_token` is set only when the
    /// access token was refreshed during this run.
    Admitted {
        identity: Identity,
        rotated_access_token: Option<SecretString>,
    },
    /// The request is rejected with a client-facing reason.
    Denied {
        reason: DenyReason,
        cause: Option<AuthFailure>,
    },
    /// The guard itself is misconfigured. Produced by the transport adapter
    /// (it owns the cookie names), never by [`crate::SessionAuthorizer`]
    /// implementations.
    Failed { cause: ConfigurationError },
}

impl AuthorizationOutcome {
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Admitted { identity, .. } => Some(identity),
            Self::Denied { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn rotated_access_token(&self) -> Option<&SecretString> {
        match self {
            Self::Admitted {
                rotated_access_token,
                ..
            } => rotated_access_token.as_ref(),
            Self::Denied { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Denied { reason, .. } => Some(*reason),
            Self::Admitted { .. } | Self::Failed { .. } => None,
        }
    }
}
