//! Server configuration: defaults, then YAML file, then `SESSION_GUARD__*` env.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use firebase_idp_plugin::FirebaseIdpPluginConfig;
use serde::{Deserialize, Serialize};
use session_guard::{RouteGuardConfig, SessionGuardConfig};
use static_idp_plugin::StaticIdpPluginConfig;

pub const ENV_PREFIX: &str = "SESSION_GUARD__";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub session_guard: SessionGuardConfig,
    /// Cookie names and error detail policy shared by the guarded routes.
    pub guard: RouteGuardConfig,
    /// Roles admitted on `/v1/admin`.
    pub admin_roles: Vec<String>,
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            session_guard: SessionGuardConfig::default(),
            guard: RouteGuardConfig::new("session", "refresh"),
            admin_roles: vec!["admin".to_owned()],
            provider: ProviderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Firebase,
    Static,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub firebase: FirebaseIdpPluginConfig,
    #[serde(rename = "static")]
    pub static_: StaticIdpPluginConfig,
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and environment overrides.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or malformed sources and on unknown keys.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(path.exists(), "config file {} not found", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        let cfg: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(cfg)
    }

    /// Startup checks; misconfiguration is fatal here rather than per request.
    ///
    /// # Errors
    ///
    /// Fails if the guard lacks a cookie name or the bind address is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.guard.validate()?;
        anyhow::ensure!(
            !self.server.bind_addr.is_empty(),
            "server.bind_addr must be set"
        );
        Ok(())
    }
}
