#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Firebase provider tests against `wiremock` stand-ins for the Google
//! endpoints. ID tokens are signed with the checked-in test key, whose public
//! half is served as the JWKS.

use std::io::Write;
use std::sync::Arc;

use firebase_idp_plugin::{FirebaseIdpPluginConfig, init};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use session_guard_sdk::{IdentityProviderClient, IdentityProviderError};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = include_str!("fixtures/test_rsa_key.pem");
const TEST_JWKS: &str = include_str!("fixtures/jwks.json");
const PROJECT: &str = "demo-project";
const KID: &str = "test-key";

struct Fixture {
    server: MockServer,
    provider: Arc<dyn IdentityProviderClient>,
    _key_file: NamedTempFile,
}

async fn fixture() -> Fixture {
    fixture_with_refetch_interval(60).await
}

async fn fixture_with_refetch_interval(jwks_min_refetch_secs: u64) -> Fixture {
    let server = MockServer::start().await;

    let mut key_file = NamedTempFile::new().unwrap();
    let key = json!({
        "type": "service_account",
        "project_id": PROJECT,
        "client_email": "guard@demo-project.iam.gserviceaccount.com",
        "private_key": TEST_KEY,
        "token_uri": format!("{}/token", server.uri()),
    });
    key_file.write_all(key.to_string().as_bytes()).unwrap();

    let cfg = FirebaseIdpPluginConfig {
        api_key: Some(SecretString::from("test-api-key".to_owned())),
        service_account_path: Some(key_file.path().to_path_buf()),
        jwks_url: format!("{}/jwks", server.uri()),
        identity_toolkit_url: server.uri(),
        secure_token_url: server.uri(),
        request_timeout_ms: 2_000,
        jwks_min_refetch_secs,
        ..FirebaseIdpPluginConfig::default()
    };
    let provider = init(&cfg).unwrap();

    Fixture {
        server,
        provider,
        _key_file: key_file,
    }
}

async fn mount_jwks(server: &MockServer, expected_fetches: u64) {
    let jwks: Value = serde_json::from_str(TEST_JWKS).unwrap();
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

async fn mount_admin_token(server: &MockServer, expected_grants: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("jwt-bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "admin-token",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(expected_grants)
        .mount(server)
        .await;
}

fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

fn id_token_claims(uid: &str) -> Value {
    let now = now();
    json!({
        "iss": format!("https://securetoken.google.com/{PROJECT}"),
        "aud": PROJECT,
        "sub": uid,
        "user_id": uid,
        "iat": now - 10,
        "exp": now + 3_600,
    })
}

fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    let key = EncodingKey::from_rsa_pem(TEST_KEY.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

#[tokio::test]
async fn valid_id_token_is_verified_and_keys_are_cached() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;
    let token = sign(&id_token_claims("alice"), Some(KID));

    let first = fx.provider.verify_token(&token).await.unwrap();
    let second = fx.provider.verify_token(&token).await.unwrap();

    assert_eq!(first.uid, "alice");
    assert_eq!(first.claims.get("user_id"), Some(&json!("alice")));
    assert_eq!(first, second);
}

#[tokio::test]
async fn expired_id_token_is_reported_as_expired() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;
    let mut claims = id_token_claims("alice");
    claims["iat"] = json!(now() - 7_200);
    claims["exp"] = json!(now() - 3_600);

    let err = fx
        .provider
        .verify_token(&sign(&claims, Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenExpired(_)), "{err:?}");
}

#[tokio::test]
async fn token_for_another_project_is_invalid() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;
    let mut claims = id_token_claims("alice");
    claims["aud"] = json!("other-project");

    let err = fx
        .provider
        .verify_token(&sign(&claims, Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn unknown_kid_refetches_keys_once() {
    let fx = fixture_with_refetch_interval(0).await;
    mount_jwks(&fx.server, 2).await;

    fx.provider
        .verify_token(&sign(&id_token_claims("alice"), Some(KID)))
        .await
        .unwrap();
    let err = fx
        .provider
        .verify_token(&sign(&id_token_claims("alice"), Some("rotated-away")))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn unknown_kids_inside_refetch_interval_use_cached_keys() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;

    fx.provider
        .verify_token(&sign(&id_token_claims("alice"), Some(KID)))
        .await
        .unwrap();
    for i in 0..20 {
        let kid = format!("bogus-{i}");
        let err = fx
            .provider
            .verify_token(&sign(&id_token_claims("mallory"), Some(&kid)))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
    }

    // The known key is still served from the cache.
    fx.provider
        .verify_token(&sign(&id_token_claims("alice"), Some(KID)))
        .await
        .unwrap();
}

#[tokio::test]
async fn token_issued_in_the_future_is_invalid() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;
    let mut claims = id_token_claims("alice");
    claims["iat"] = json!(now() + 600);

    let err = fx
        .provider
        .verify_token(&sign(&claims, Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn auth_time_in_the_future_is_invalid() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 1).await;
    let mut claims = id_token_claims("alice");
    claims["auth_time"] = json!(now() + 600);

    let err = fx
        .provider
        .verify_token(&sign(&claims, Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn token_without_kid_is_rejected_without_fetching_keys() {
    let fx = fixture().await;
    mount_jwks(&fx.server, 0).await;

    let err = fx
        .provider
        .verify_token(&sign(&id_token_claims("alice"), None))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let fx = fixture().await;

    let err = fx.provider.verify_token("not-a-jwt").await.unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_jwks_is_unavailable() {
    let fx = fixture().await;
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fx.server)
        .await;

    let err = fx
        .provider
        .verify_token(&sign(&id_token_claims("alice"), Some(KID)))
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityProviderError::Unavailable(_)), "{err:?}");
}

#[tokio::test]
async fn account_lookup_reads_state_and_reuses_admin_token() {
    let fx = fixture().await;
    mount_admin_token(&fx.server, 1).await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({"localId": ["alice"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
            "users": [{
                "localId": "alice",
                "disabled": true,
                "customAttributes": "{\"roles\":[\"admin\"],\"tier\":\"gold\"}",
            }],
        })))
        .expect(2)
        .mount(&fx.server)
        .await;

    let first = fx.provider.get_account("alice").await.unwrap();
    let second = fx.provider.get_account("alice").await.unwrap();

    assert!(first.disabled);
    assert_eq!(first.custom_claims.get("roles"), Some(&json!(["admin"])));
    assert_eq!(first, second);
}

#[tokio::test]
async fn account_without_custom_attributes_has_no_claims() {
    let fx = fixture().await;
    mount_admin_token(&fx.server, 1).await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"localId": "bob"}],
        })))
        .mount(&fx.server)
        .await;

    let account = fx.provider.get_account("bob").await.unwrap();

    assert!(!account.disabled);
    assert!(account.custom_claims.is_empty());
}

#[tokio::test]
async fn deleted_user_is_invalid() {
    let fx = fixture().await;
    mount_admin_token(&fx.server, 1).await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#GetAccountInfoResponse",
        })))
        .mount(&fx.server)
        .await;

    let err = fx.provider.get_account("ghost").await.unwrap_err();

    assert!(matches!(err, IdentityProviderError::TokenInvalid(_)), "{err:?}");
}

#[tokio::test]
async fn lookup_outage_is_unavailable() {
    let fx = fixture().await;
    mount_admin_token(&fx.server, 1).await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{PROJECT}/accounts:lookup")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fx.server)
        .await;

    let err = fx.provider.get_account("alice").await.unwrap_err();

    assert!(matches!(err, IdentityProviderError::Unavailable(_)), "{err:?}");
}

#[tokio::test]
async fn refresh_exchanges_token_with_api_key() {
    let fx = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(query_param("key", "test-api-key"))
        .and(body_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "rt-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-id-token",
            "id_token": "new-id-token",
            "refresh_token": "rt-1",
            "expires_in": "3600",
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let refreshed = fx.provider.exchange_refresh_token("rt-1").await.unwrap();

    assert_eq!(refreshed.access_token.expose_secret(), "new-id-token");
}

#[tokio::test]
async fn refresh_falls_back_to_id_token() {
    let fx = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "only-id-token",
        })))
        .mount(&fx.server)
        .await;

    let refreshed = fx.provider.exchange_refresh_token("rt-1").await.unwrap();

    assert_eq!(refreshed.access_token.expose_secret(), "only-id-token");
}

#[tokio::test]
async fn declined_refresh_carries_provider_message() {
    let fx = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "TOKEN_EXPIRED", "status": "INVALID_ARGUMENT"},
        })))
        .mount(&fx.server)
        .await;

    let err = fx.provider.exchange_refresh_token("rt-1").await.unwrap_err();

    assert_eq!(
        err,
        IdentityProviderError::RefreshRejected("TOKEN_EXPIRED".to_owned())
    );
}

#[tokio::test]
async fn refresh_outage_is_unavailable() {
    let fx = fixture().await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fx.server)
        .await;

    let err = fx.provider.exchange_refresh_token("rt-1").await.unwrap_err();

    assert!(matches!(err, IdentityProviderError::Unavailable(_)), "{err:?}");
}

#[test]
fn init_requires_service_account_and_api_key() {
    let no_key_path = FirebaseIdpPluginConfig {
        api_key: Some(SecretString::from("k".to_owned())),
        ..FirebaseIdpPluginConfig::default()
    };
    assert!(init(&no_key_path).is_err());

    let mut key_file = NamedTempFile::new().unwrap();
    let key = json!({
        "project_id": PROJECT,
        "client_email": "guard@demo-project.iam.gserviceaccount.com",
        "private_key": TEST_KEY,
    });
    key_file.write_all(key.to_string().as_bytes()).unwrap();
    let no_api_key = FirebaseIdpPluginConfig {
        service_account_path: Some(key_file.path().to_path_buf()),
        ..FirebaseIdpPluginConfig::default()
    };
    assert!(init(&no_api_key).is_err());
}
