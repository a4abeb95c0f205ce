//! Signing-key cache for ID token verification.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::error::DomainError;

const ENDPOINT: &str = "jwks";

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

enum Lookup {
    Hit(DecodingKey),
    /// Unknown `kid` while the key set is younger than `min_refetch`.
    Miss,
    Refetch,
}

/// Public keys by `kid`, refetched after `ttl`, or on an unknown `kid` once
/// the set is at least `min_refetch` old.
///
/// The `kid` comes from an unverified header, so unknown ones must not force
/// a fetch per request. The lock is never held across a fetch; concurrent
/// misses may fetch twice.
pub(crate) struct KeyCache {
    http: reqwest::Client,
    url: String,
    ttl: Duration,
    min_refetch: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

impl KeyCache {
    pub(crate) fn new(
        http: reqwest::Client,
        url: String,
        ttl: Duration,
        min_refetch: Duration,
    ) -> Self {
        Self {
            http,
            url,
            ttl,
            min_refetch,
            cached: RwLock::new(None),
        }
    }

    /// Key for `kid`, fetching the key set at most once per call.
    pub(crate) async fn key(&self, kid: &str) -> Result<DecodingKey, DomainError> {
        match self.lookup(kid) {
            Lookup::Hit(key) => return Ok(key),
            Lookup::Miss => {
                debug!(kid, "unknown kid, key set too recent to refetch");
                return Err(unknown_kid(kid));
            }
            Lookup::Refetch => {}
        }

        let keys = self.fetch().await?;
        let key = keys.get(kid).cloned();
        *self.cached.write() = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key.ok_or_else(|| unknown_kid(kid))
    }

    fn lookup(&self, kid: &str) -> Lookup {
        let guard = self.cached.read();
        let Some(cached) = guard.as_ref() else {
            return Lookup::Refetch;
        };
        let age = cached.fetched_at.elapsed();
        if age >= self.ttl {
            return Lookup::Refetch;
        }
        match cached.keys.get(kid) {
            Some(key) => Lookup::Hit(key.clone()),
            None if age < self.min_refetch => Lookup::Miss,
            None => Lookup::Refetch,
        }
    }

    async fn fetch(&self) -> Result<HashMap<String, DecodingKey>, DomainError> {
        debug!(url = %self.url, "fetching signing keys");
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DomainError::transport(ENDPOINT, &e))?;

        if !response.status().is_success() {
            return Err(DomainError::Transport {
                endpoint: ENDPOINT,
                message: format!("status {}", response.status()),
            });
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| DomainError::unexpected(ENDPOINT, e.to_string()))?;

        let mut keys = HashMap::with_capacity(set.keys.len());
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(e) => warn!(kid = %kid, error = %e, "skipping unusable signing key"),
            }
        }

        if keys.is_empty() {
            return Err(DomainError::unexpected(ENDPOINT, "key set has no usable keys"));
        }
        Ok(keys)
    }
}

fn unknown_kid(kid: &str) -> DomainError {
    DomainError::InvalidToken(format!("no signing key with kid '{kid}'"))
}
