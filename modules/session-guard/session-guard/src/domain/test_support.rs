//! In-memory identity provider with call counters for domain tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use session_guard_sdk::{
    AccountRecord, IdentityProviderClient, IdentityProviderError, RefreshedToken, VerifiedToken,
};

#[derive(Default)]
pub(crate) struct StubProvider {
    tokens: HashMap<String, Result<String, IdentityProviderError>>,
    accounts: HashMap<String, AccountRecord>,
    refreshes: HashMap<String, Result<String, IdentityProviderError>>,
    verify_delay: Option<Duration>,
    verify_calls: AtomicUsize,
    account_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl StubProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `token` verifies as `uid`.
    pub(crate) fn token(mut self, token: &str, uid: &str) -> Self {
        self.tokens.insert(token.to_owned(), Ok(uid.to_owned()));
        self
    }

    pub(crate) fn token_error(mut self, token: &str, err: IdentityProviderError) -> Self {
        self.tokens.insert(token.to_owned(), Err(err));
        self
    }

    pub(crate) fn expired(self, token: &str) -> Self {
        self.token_error(token, IdentityProviderError::TokenExpired("id token expired".to_owned()))
    }

    pub(crate) fn account(mut self, uid: &str, disabled: bool, roles: &[&str]) -> Self {
        let custom_claims = match json!({ "roles": roles }) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.accounts.insert(
            uid.to_owned(),
            AccountRecord {
                disabled,
                custom_claims,
            },
        );
        self
    }

    /// `refresh_token` exchanges for `access_token`.
    pub(crate) fn refresh(mut self, refresh_token: &str, access_token: &str) -> Self {
        self.refreshes
            .insert(refresh_token.to_owned(), Ok(access_token.to_owned()));
        self
    }

    pub(crate) fn refresh_error(mut self, refresh_token: &str, err: IdentityProviderError) -> Self {
        self.refreshes.insert(refresh_token.to_owned(), Err(err));
        self
    }

    pub(crate) fn stall_verify(mut self, delay: Duration) -> Self {
        self.verify_delay = Some(delay);
        self
    }

    pub(crate) fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn account_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProviderClient for StubProvider {
    async fn verify_token(
        &self,
        access_token: &str,
    ) -> Result<VerifiedToken, IdentityProviderError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.verify_delay {
            tokio::time::sleep(delay).await;
        }
        match self.tokens.get(access_token) {
            Some(Ok(uid)) => {
                let mut claims = Map::new();
                claims.insert("sub".to_owned(), Value::String(uid.clone()));
                Ok(VerifiedToken {
                    uid: uid.clone(),
                    claims,
                })
            }
            Some(Err(err)) => Err(err.clone()),
            None => Err(IdentityProviderError::TokenInvalid(
                "unknown token".to_owned(),
            )),
        }
    }

    async fn get_account(&self, uid: &str) -> Result<AccountRecord, IdentityProviderError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .get(uid)
            .cloned()
            .ok_or_else(|| IdentityProviderError::TokenInvalid(format!("no user {uid}")))
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<RefreshedToken, IdentityProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        match self.refreshes.get(refresh_token) {
            Some(Ok(token)) => Ok(RefreshedToken {
                access_token: SecretString::from(token.clone()),
            }),
            Some(Err(err)) => Err(err.clone()),
            None => Err(IdentityProviderError::RefreshRejected(
                "INVALID_REFRESH_TOKEN".to_owned(),
            )),
        }
    }
}
