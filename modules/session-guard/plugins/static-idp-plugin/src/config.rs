//! Configuration for the static identity provider plugin.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticIdpPluginConfig {
    /// Known accounts.
    pub accounts: Vec<AccountConfig>,

    /// Access tokens and the account each one belongs to.
    pub tokens: Vec<TokenMapping>,

    /// Refresh tokens and the access token each one exchanges for.
    pub refresh_tokens: Vec<RefreshMapping>,
}

/// One account record.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccountConfig {
    pub uid: String,

    pub disabled: bool,

    /// Written into the `roles` custom claim.
    pub roles: Vec<String>,

    /// Extra custom claims. A `roles` entry here is overridden by `roles`.
    pub custom_claims: Map<String, Value>,
}

/// Maps a static access token to an account.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    pub token: String,
    pub uid: String,
    /// Report this token as expired instead of valid.
    #[serde(default)]
    pub expired: bool,
}

/// Maps a refresh token to the access token it yields.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshMapping {
    pub refresh_token: String,
    pub access_token: String,
}
