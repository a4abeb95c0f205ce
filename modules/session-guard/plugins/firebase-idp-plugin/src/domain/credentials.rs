//! Service-account key file.

use std::path::Path;

use jsonwebtoken::EncodingKey;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::DomainError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// The fields of a Google service-account JSON key the plugin needs.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Read and parse a key file. Blocking; called once at startup.
    ///
    /// # Errors
    ///
    /// [`DomainError::Credentials`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// # Errors
    ///
    /// [`DomainError::Credentials`] for malformed JSON or missing fields.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let key: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::Credentials(format!("malformed key file: {e}")))?;
        if key.client_email.is_empty() || key.project_id.is_empty() {
            return Err(DomainError::Credentials(
                "client_email and project_id must be set".to_owned(),
            ));
        }
        Ok(key)
    }

    /// RSA signing key for JWT-bearer assertions.
    ///
    /// # Errors
    ///
    /// [`DomainError::Credentials`] if `private_key` is not a PEM RSA key.
    pub fn signing_key(&self) -> Result<EncodingKey, DomainError> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes())
            .map_err(|e| DomainError::Credentials(format!("invalid private_key: {e}")))
    }
}
