//! Service implementation for the static identity provider plugin.

use std::collections::HashMap;

use serde_json::{Map, Value};
use session_guard_sdk::models::ROLES_CLAIM;
use session_guard_sdk::{AccountRecord, VerifiedToken};

use super::error::DomainError;
use crate::config::{AccountConfig, StaticIdpPluginConfig, TokenMapping};

/// Static identity provider service.
///
/// Lookups are pure map reads; later entries win on duplicate keys.
pub struct Service {
    accounts: HashMap<String, AccountRecord>,
    tokens: HashMap<String, TokenMapping>,
    refresh_tokens: HashMap<String, String>,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticIdpPluginConfig) -> Self {
        let accounts = cfg
            .accounts
            .iter()
            .map(|a| (a.uid.clone(), account_record(a)))
            .collect();
        let tokens = cfg
            .tokens
            .iter()
            .map(|t| (t.token.clone(), t.clone()))
            .collect();
        let refresh_tokens = cfg
            .refresh_tokens
            .iter()
            .map(|r| (r.refresh_token.clone(), r.access_token.clone()))
            .collect();

        Self {
            accounts,
            tokens,
            refresh_tokens,
        }
    }

    /// Resolve an access token to its account uid.
    ///
    /// # Errors
    ///
    /// [`DomainError::UnknownToken`] or [`DomainError::Expired`].
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, DomainError> {
        let mapping = self.tokens.get(token).ok_or(DomainError::UnknownToken)?;
        if mapping.expired {
            return Err(DomainError::Expired);
        }

        let mut claims = Map::new();
        claims.insert("sub".to_owned(), Value::String(mapping.uid.clone()));
        Ok(VerifiedToken {
            uid: mapping.uid.clone(),
            claims,
        })
    }

    /// # Errors
    ///
    /// [`DomainError::UnknownAccount`] when no account has this uid.
    pub fn account(&self, uid: &str) -> Result<AccountRecord, DomainError> {
        self.accounts
            .get(uid)
            .cloned()
            .ok_or_else(|| DomainError::UnknownAccount(uid.to_owned()))
    }

    /// # Errors
    ///
    /// [`DomainError::UnknownRefreshToken`] when the token is not configured.
    pub fn refresh(&self, refresh_token: &str) -> Result<&str, DomainError> {
        self.refresh_tokens
            .get(refresh_token)
            .map(String::as_str)
            .ok_or(DomainError::UnknownRefreshToken)
    }
}

fn account_record(cfg: &AccountConfig) -> AccountRecord {
    let mut custom_claims = cfg.custom_claims.clone();
    if !cfg.roles.is_empty() {
        custom_claims.insert(
            ROLES_CLAIM.to_owned(),
            Value::Array(cfg.roles.iter().cloned().map(Value::String).collect()),
        );
    }
    AccountRecord {
        disabled: cfg.disabled,
        custom_claims,
    }
}
