//! Public API implementation for the session guard.
//!
//! Implements `SessionAuthorizer` using the domain service.

use async_trait::async_trait;
use session_guard_sdk::{AuthorizationOutcome, AuthorizationRequest, SessionAuthorizer};

use super::service::Service;

#[async_trait]
impl SessionAuthorizer for Service {
    async fn authorize(&self, request: &AuthorizationRequest) -> AuthorizationOutcome {
        Service::authorize(self, request).await
    }
}
