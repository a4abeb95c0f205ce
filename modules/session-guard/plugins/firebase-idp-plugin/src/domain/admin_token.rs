//! Service-account access tokens for the Identity Toolkit admin API.

use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use secrecy::SecretString;
use time::OffsetDateTime;
use tracing::debug;

use super::credentials::ServiceAccountKey;
use super::error::DomainError;
use super::wire::{AssertionClaims, OAuthTokenResponse, error_message};

const ENDPOINT: &str = "oauth2 token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";
const ASSERTION_LIFETIME_SECS: i64 = 3_600;
/// Tokens are dropped this long before their stated expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Mints and caches OAuth2 access tokens with the JWT-bearer grant.
pub(crate) struct AdminTokenSource {
    http: reqwest::Client,
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl AdminTokenSource {
    pub(crate) fn new(http: reqwest::Client, key: &ServiceAccountKey) -> Result<Self, DomainError> {
        Ok(Self {
            http,
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            signing_key: key.signing_key()?,
            cached: Mutex::new(None),
        })
    }

    /// A valid bearer token, minting a new one when the cached one is stale.
    pub(crate) async fn bearer(&self) -> Result<SecretString, DomainError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let (token, lifetime) = self.mint().await?;
        *self.cached.lock() = Some(CachedToken {
            token: token.clone(),
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        });
        Ok(token)
    }

    fn cached_token(&self) -> Option<SecretString> {
        let guard = self.cached.lock();
        guard
            .as_ref()
            .filter(|c| Instant::now() < c.refresh_at)
            .map(|c| c.token.clone())
    }

    fn assertion(&self) -> Result<String, DomainError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| DomainError::Credentials(format!("cannot sign assertion: {e}")))
    }

    async fn mint(&self) -> Result<(SecretString, Duration), DomainError> {
        debug!(token_uri = %self.token_uri, "minting service-account access token");
        let assertion = self.assertion()?;
        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::transport(ENDPOINT, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("status {status}: {}", error_message(&body));
            return Err(if status.is_server_error() {
                DomainError::Transport {
                    endpoint: ENDPOINT,
                    message,
                }
            } else {
                DomainError::unexpected(ENDPOINT, message)
            });
        }

        let body: OAuthTokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::unexpected(ENDPOINT, e.to_string()))?;
        Ok((
            SecretString::from(body.access_token),
            Duration::from_secs(body.expires_in),
        ))
    }
}

impl std::fmt::Debug for AdminTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminTokenSource")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use jsonwebtoken::{DecodingKey, Validation};

    use super::*;

    const TEST_KEY: &str = include_str!("../../tests/fixtures/test_rsa_key.pem");
    const TEST_JWKS: &str = include_str!("../../tests/fixtures/jwks.json");

    #[test]
    fn assertion_is_signed_for_token_uri() {
        let key = ServiceAccountKey::from_json(
            &serde_json::json!({
                "project_id": "demo-project",
                "client_email": "guard@demo-project.iam.gserviceaccount.com",
                "private_key": TEST_KEY,
                "token_uri": "http://127.0.0.1:1/token",
            })
            .to_string(),
        )
        .unwrap();
        let source = AdminTokenSource::new(reqwest::Client::new(), &key).unwrap();

        let assertion = source.assertion().unwrap();

        let set: jsonwebtoken::jwk::JwkSet = serde_json::from_str(TEST_JWKS).unwrap();
        let decoding = DecodingKey::from_jwk(&set.keys[0]).unwrap();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["http://127.0.0.1:1/token"]);
        let data =
            jsonwebtoken::decode::<serde_json::Value>(&assertion, &decoding, &validation).unwrap();
        assert_eq!(
            data.claims["iss"],
            "guard@demo-project.iam.gserviceaccount.com"
        );
        assert!(data.claims["scope"].as_str().unwrap().contains("identitytoolkit"));
    }
}
