//! Access control orchestrator.
//!
//! One run per request: verify, optionally refresh and verify again, then
//! check account state and roles. Runs share nothing but the provider client.

use std::collections::BTreeSet;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use session_guard_sdk::{
    AuthFailure, AuthorizationOutcome, AuthorizationRequest, DenyReason, Identity,
    IdentityProviderClient, RefreshError, VerifyError,
};
use tracing::{debug, info, warn};

use super::refresher::TokenRefresher;
use super::roles::is_role_permitted;
use super::verifier::IdentityVerifier;
use crate::config::SessionGuardConfig;

/// Where in the run a denial happened. Only used for log fields.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Verify,
    Refresh,
    Reverify,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Refresh => "refresh",
            Self::Reverify => "reverify",
        }
    }
}

/// Session guard service.
#[derive(Clone)]
pub struct Service {
    verifier: IdentityVerifier,
    refresher: TokenRefresher,
}

impl Service {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProviderClient>, cfg: &SessionGuardConfig) -> Self {
        let timeout = cfg.provider_timeout();
        Self {
            verifier: IdentityVerifier::new(Arc::clone(&provider), timeout),
            refresher: TokenRefresher::new(provider, timeout),
        }
    }

    /// Decide whether one request may proceed.
    ///
    /// Never fails: every provider error is folded into a denial. At most one
    /// refresh is attempted, and only when the access token has expired and a
    /// refresh token is present.
    #[tracing::instrument(skip_all, fields(allowed_roles = request.allowed_roles.len()))]
    pub async fn authorize(&self, request: &AuthorizationRequest) -> AuthorizationOutcome {
        let Some(access_token) = request.credentials.access_token() else {
            debug!("no access token presented");
            return deny(DenyReason::AccessDenied, None);
        };

        match self.verifier.verify(access_token.expose_secret()).await {
            Ok(identity) => decide(identity, &request.allowed_roles, None),
            Err(VerifyError::TokenExpired(msg)) => {
                if let Some(refresh_token) = request.credentials.refresh_token() {
                    debug!("access token expired, attempting refresh");
                    self.refresh_and_reverify(refresh_token, &request.allowed_roles)
                        .await
                } else {
                    debug!("access token expired and no refresh token presented");
                    denied_by(Stage::Verify, VerifyError::TokenExpired(msg).into())
                }
            }
            Err(err) => denied_by(Stage::Verify, err.into()),
        }
    }

    async fn refresh_and_reverify(
        &self,
        refresh_token: &SecretString,
        allowed_roles: &BTreeSet<String>,
    ) -> AuthorizationOutcome {
        let rotated = match self.refresher.refresh(refresh_token.expose_secret()).await {
            Ok(token) => token,
            Err(err) => return denied_by(Stage::Refresh, err.into()),
        };

        // A second expiry here is terminal.
        match self.verifier.verify(rotated.expose_secret()).await {
            Ok(identity) => decide(identity, allowed_roles, Some(rotated)),
            Err(err) => denied_by(Stage::Reverify, err.into()),
        }
    }
}

/// Account state and role check on a verified identity.
///
/// The rotated token survives only into an admit.
fn decide(
    identity: Identity,
    allowed_roles: &BTreeSet<String>,
    rotated_access_token: Option<SecretString>,
) -> AuthorizationOutcome {
    if identity.is_disabled() {
        info!(uid = identity.uid(), "account disabled");
        return deny(DenyReason::AccountDisabled, None);
    }

    if !is_role_permitted(allowed_roles, identity.roles()) {
        info!(uid = identity.uid(), "caller lacks a permitted role");
        return deny(DenyReason::Unauthorized, None);
    }

    debug!(
        uid = identity.uid(),
        rotated = rotated_access_token.is_some(),
        "request admitted"
    );
    AuthorizationOutcome::Admitted {
        identity,
        rotated_access_token,
    }
}

fn denied_by(stage: Stage, cause: AuthFailure) -> AuthorizationOutcome {
    match &cause {
        AuthFailure::Verify(VerifyError::Provider(_))
        | AuthFailure::Refresh(RefreshError::Provider(_)) => {
            warn!(stage = stage.as_str(), error = %cause, "identity provider failure");
        }
        _ => debug!(stage = stage.as_str(), error = %cause, "authentication rejected"),
    }
    deny(DenyReason::AccessDenied, Some(cause))
}

fn deny(reason: DenyReason, cause: Option<AuthFailure>) -> AuthorizationOutcome {
    AuthorizationOutcome::Denied { reason, cause }
}
