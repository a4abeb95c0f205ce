//! JSON error bodies for guard rejections.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use session_guard_sdk::{AuthFailure, ConfigurationError, DenyReason};
use thiserror::Error;

/// Message sent when a route guard lacks its cookie names.
pub const CONFIGURATION_MESSAGE: &str = "accessTokenKey and refreshTokenKey are required";

/// Body of every response produced by the guard itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Errors the session guard layer turns into HTTP responses.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("{reason:?}")]
    Denied {
        reason: DenyReason,
        cause: Option<AuthFailure>,
        expose_details: bool,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A handler asked for the identity on a route the guard does not cover.
    #[error("identity not found - session guard middleware not configured")]
    MissingIdentity,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        match self {
            Self::Denied {
                reason,
                cause,
                expose_details,
            } => {
                let status = StatusCode::UNAUTHORIZED;
                ErrorBody {
                    status: status.as_u16(),
                    message: reason.message().to_owned(),
                    error: cause
                        .filter(|_| expose_details)
                        .map(|cause| cause.to_string()),
                }
                .into_response_with(status)
            }
            Self::Configuration(err) => {
                tracing::error!(error = %err, "session guard misconfigured");
                let status = StatusCode::BAD_REQUEST;
                ErrorBody {
                    status: status.as_u16(),
                    message: CONFIGURATION_MESSAGE.to_owned(),
                    error: Some(err.to_string()),
                }
                .into_response_with(status)
            }
            Self::MissingIdentity => {
                tracing::error!("identity extractor used without session guard middleware");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                ErrorBody {
                    status: status.as_u16(),
                    message: "Internal server error".to_owned(),
                    error: None,
                }
                .into_response_with(status)
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use session_guard_sdk::VerifyError;

    use super::*;

    #[test]
    fn error_field_is_omitted_when_absent() {
        let body = ErrorBody {
            status: 401,
            message: "Access denied".to_owned(),
            error: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": 401, "message": "Access denied"}));
    }

    #[test]
    fn denial_maps_to_unauthorized() {
        let response = GuardError::Denied {
            reason: DenyReason::AccessDenied,
            cause: Some(VerifyError::TokenInvalid("bad signature".to_owned()).into()),
            expose_details: false,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn configuration_maps_to_bad_request() {
        let response =
            GuardError::from(ConfigurationError::new(vec!["access_token_key"])).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
