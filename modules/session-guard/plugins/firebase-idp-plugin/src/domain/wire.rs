//! REST payloads exchanged with Google endpoints.

use serde::{Deserialize, Serialize};

/// `accounts:lookup` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupRequest<'a> {
    pub local_id: [&'a str; 1],
}

/// `accounts:lookup` response. `users` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub users: Vec<UserInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserInfo {
    pub local_id: String,
    #[serde(default)]
    pub disabled: bool,
    /// Custom claims as a JSON-encoded object.
    pub custom_attributes: Option<String>,
}

/// securetoken `v1/token` request.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

/// securetoken `v1/token` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: Option<String>,
    pub id_token: Option<String>,
}

/// OAuth2 token endpoint response for the JWT-bearer grant.
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3_600
}

/// Claims of a JWT-bearer assertion.
#[derive(Debug, Serialize)]
pub(crate) struct AssertionClaims<'a> {
    pub iss: &'a str,
    pub scope: &'static str,
    pub aud: &'a str,
    pub iat: i64,
    pub exp: i64,
}

/// Google API error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

/// Best-effort extraction of the provider's error message.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect())
}
