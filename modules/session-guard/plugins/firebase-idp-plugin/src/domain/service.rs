//! Service implementation for the Firebase identity provider plugin.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use session_guard_sdk::{AccountRecord, VerifiedToken};
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

use super::admin_token::AdminTokenSource;
use super::credentials::ServiceAccountKey;
use super::error::DomainError;
use super::jwks::KeyCache;
use super::wire::{LookupRequest, LookupResponse, RefreshRequest, RefreshResponse, error_message};
use crate::config::FirebaseIdpPluginConfig;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const LOOKUP_ENDPOINT: &str = "accounts:lookup";
const REFRESH_ENDPOINT: &str = "securetoken";
/// Clock skew tolerated on every time-based claim.
const LEEWAY_SECS: u64 = 60;

/// Firebase identity provider service.
pub struct Service {
    http: reqwest::Client,
    project_id: String,
    api_key: SecretString,
    lookup_url: Url,
    refresh_url: Url,
    keys: KeyCache,
    admin: AdminTokenSource,
}

impl Service {
    /// Build the service from configuration and a loaded service-account key.
    ///
    /// # Errors
    ///
    /// [`DomainError::Config`] for a missing API key or malformed endpoint
    /// URLs, [`DomainError::Credentials`] for an unusable private key.
    pub fn new(cfg: &FirebaseIdpPluginConfig, key: &ServiceAccountKey) -> Result<Self, DomainError> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or_else(|| DomainError::Config("api_key is required".to_owned()))?;
        let project_id = cfg
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| key.project_id.clone());

        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| DomainError::Config(format!("cannot build HTTP client: {e}")))?;

        let lookup_url = endpoint(
            &cfg.identity_toolkit_url,
            &format!("v1/projects/{project_id}/accounts:lookup"),
        )?;
        let refresh_url = endpoint(&cfg.secure_token_url, "v1/token")?;

        Ok(Self {
            keys: KeyCache::new(
                http.clone(),
                cfg.jwks_url.clone(),
                cfg.jwks_cache_ttl(),
                cfg.jwks_min_refetch(),
            ),
            admin: AdminTokenSource::new(http.clone(), key)?,
            http,
            project_id,
            api_key,
            lookup_url,
            refresh_url,
        })
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Verify a Firebase ID token.
    ///
    /// # Errors
    ///
    /// - [`DomainError::TokenExpired`] past `exp` (beyond the default leeway)
    /// - [`DomainError::InvalidToken`] for any other validation failure,
    ///   including `iat` or `auth_time` in the future
    /// - [`DomainError::Transport`] when signing keys cannot be fetched
    pub async fn verify(&self, id_token: &str) -> Result<VerifiedToken, DomainError> {
        let header = jsonwebtoken::decode_header(id_token)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(DomainError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| DomainError::InvalidToken("missing kid header".to_owned()))?;

        let key = self.keys.key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECS;
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{ISSUER_PREFIX}{}", self.project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = jsonwebtoken::decode::<Map<String, Value>>(id_token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::TokenExpired,
                _ => DomainError::InvalidToken(e.to_string()),
            })?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        not_in_future(&data.claims, "iat", now, true)?;
        not_in_future(&data.claims, "auth_time", now, false)?;

        let uid = data
            .claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| DomainError::InvalidToken("empty sub claim".to_owned()))?;

        Ok(VerifiedToken {
            uid,
            claims: data.claims,
        })
    }

    /// Current account state from `accounts:lookup`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UserNotFound`] when the uid has no record
    /// - [`DomainError::Transport`] for network faults and 5xx answers
    /// - [`DomainError::UnexpectedResponse`] for other non-success answers
    pub async fn account(&self, uid: &str) -> Result<AccountRecord, DomainError> {
        let bearer = self.admin.bearer().await?;
        let response = self
            .http
            .post(self.lookup_url.clone())
            .bearer_auth(bearer.expose_secret())
            .json(&LookupRequest { local_id: [uid] })
            .send()
            .await
            .map_err(|e| DomainError::transport(LOOKUP_ENDPOINT, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(non_success(LOOKUP_ENDPOINT, status, &body));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| DomainError::unexpected(LOOKUP_ENDPOINT, e.to_string()))?;
        let user = body
            .users
            .into_iter()
            .find(|u| u.local_id == uid)
            .ok_or_else(|| DomainError::UserNotFound(uid.to_owned()))?;

        let custom_claims = match user.custom_attributes.as_deref() {
            None | Some("") => Map::new(),
            Some(raw) => serde_json::from_str(raw).map_err(|e| {
                DomainError::unexpected(LOOKUP_ENDPOINT, format!("bad customAttributes: {e}"))
            })?,
        };

        debug!(uid, disabled = user.disabled, "loaded account record");
        Ok(AccountRecord {
            disabled: user.disabled,
            custom_claims,
        })
    }

    /// Exchange a refresh token at the securetoken endpoint.
    ///
    /// # Errors
    ///
    /// - [`DomainError::RefreshRejected`] for 4xx answers, carrying the
    ///   provider's `error.message`
    /// - [`DomainError::Transport`] for network faults and 5xx answers
    /// - [`DomainError::UnexpectedResponse`] for a success without a token
    pub async fn refresh(&self, refresh_token: &str) -> Result<SecretString, DomainError> {
        let mut url = self.refresh_url.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());

        let response = self
            .http
            .post(url)
            .json(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await
            .map_err(|e| DomainError::transport(REFRESH_ENDPOINT, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.is_client_error() {
                return Err(DomainError::RefreshRejected(error_message(&body)));
            }
            return Err(non_success(REFRESH_ENDPOINT, status, &body));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| DomainError::unexpected(REFRESH_ENDPOINT, e.to_string()))?;
        body.access_token
            .or(body.id_token)
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| DomainError::unexpected(REFRESH_ENDPOINT, "no token in response"))
    }
}

/// `claim` must be a timestamp no later than `now` (plus leeway).
fn not_in_future(
    claims: &Map<String, Value>,
    claim: &str,
    now: i64,
    required: bool,
) -> Result<(), DomainError> {
    let Some(value) = claims.get(claim) else {
        return if required {
            Err(DomainError::InvalidToken(format!("missing {claim} claim")))
        } else {
            Ok(())
        };
    };
    let issued = value
        .as_i64()
        .ok_or_else(|| DomainError::InvalidToken(format!("{claim} is not a timestamp")))?;
    if issued > now.saturating_add(LEEWAY_SECS.cast_signed()) {
        return Err(DomainError::InvalidToken(format!("{claim} is in the future")));
    }
    Ok(())
}

fn endpoint(base: &str, path: &str) -> Result<Url, DomainError> {
    let base = if base.ends_with('/') {
        base.to_owned()
    } else {
        format!("{base}/")
    };
    Url::parse(&base)
        .and_then(|b| b.join(path))
        .map_err(|e| DomainError::Config(format!("invalid endpoint '{base}': {e}")))
}

fn non_success(endpoint: &'static str, status: reqwest::StatusCode, body: &str) -> DomainError {
    let message = format!("status {status}: {}", error_message(body));
    if status.is_server_error() {
        DomainError::Transport { endpoint, message }
    } else {
        DomainError::unexpected(endpoint, message)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_or_without_trailing_slash() {
        let a = endpoint("http://localhost:9099", "v1/token").unwrap();
        let b = endpoint("http://localhost:9099/", "v1/token").unwrap();
        assert_eq!(a.as_str(), "http://localhost:9099/v1/token");
        assert_eq!(a, b);
    }

    #[test]
    fn lookup_path_keeps_colon_segment() {
        let url = endpoint(
            "https://identitytoolkit.googleapis.com",
            "v1/projects/demo/accounts:lookup",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/projects/demo/accounts:lookup"
        );
    }

    #[test]
    fn server_errors_are_transport_faults() {
        assert!(matches!(
            non_success("x", reqwest::StatusCode::BAD_GATEWAY, ""),
            DomainError::Transport { .. }
        ));
        assert!(matches!(
            non_success("x", reqwest::StatusCode::FORBIDDEN, ""),
            DomainError::UnexpectedResponse { .. }
        ));
    }

    #[test]
    fn timestamps_within_leeway_are_accepted() {
        let claims: Map<String, Value> =
            serde_json::from_value(serde_json::json!({ "iat": 1_030, "auth_time": 900 })).unwrap();

        assert!(not_in_future(&claims, "iat", 1_000, true).is_ok());
        assert!(not_in_future(&claims, "auth_time", 1_000, false).is_ok());
        assert!(not_in_future(&claims, "missing", 1_000, false).is_ok());
    }

    #[test]
    fn future_or_missing_timestamps_are_invalid() {
        let claims: Map<String, Value> =
            serde_json::from_value(serde_json::json!({ "iat": 2_000, "auth_time": "soon" }))
                .unwrap();

        assert!(matches!(
            not_in_future(&claims, "iat", 1_000, true),
            Err(DomainError::InvalidToken(_))
        ));
        assert!(matches!(
            not_in_future(&claims, "auth_time", 1_000, false),
            Err(DomainError::InvalidToken(_))
        ));
        assert!(matches!(
            not_in_future(&Map::new(), "iat", 1_000, true),
            Err(DomainError::InvalidToken(_))
        ));
    }
}
