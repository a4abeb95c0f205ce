use std::future::Future;
use std::time::Duration;

use session_guard_sdk::IdentityProviderError;

/// Await a provider call, giving up after `timeout`.
///
/// An elapsed deadline is reported as [`IdentityProviderError::Unavailable`];
/// the pending call is dropped.
pub(super) async fn with_deadline<T, F>(
    operation: &'static str,
    timeout: Duration,
    call: F,
) -> Result<T, IdentityProviderError>
where
    F: Future<Output = Result<T, IdentityProviderError>>,
{
    if let Ok(result) = tokio::time::timeout(timeout, call).await {
        result
    } else {
        tracing::warn!(
            operation,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "identity provider call timed out"
        );
        Err(IdentityProviderError::Unavailable(format!(
            "{operation} timed out after {timeout:?}"
        )))
    }
}
