//! Retry on authentication failure.
//!
//! Management tokens can expire or be rejected transiently right after
//! issue. Operations wrapped here are re-run from the start when they fail
//! with an authentication failure; any other outcome is returned as-is.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use scaleq_core::{Error, ErrorCode, RetryConfig};
use scaleq_monitor::MonitorError;

/// Errors that can tell whether they were caused by a rejected credential.
pub trait AuthFailure {
    fn is_auth_failure(&self) -> bool;
}

impl AuthFailure for MonitorError {
    fn is_auth_failure(&self) -> bool {
        MonitorError::is_auth_failure(self)
    }
}

impl AuthFailure for Error {
    fn is_auth_failure(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub tries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            tries: config.auth_failure_tries.max(1),
            delay: config.auth_failure_delay(),
        }
    }
}

/// Run `op` up to `policy.tries` times while it fails with an auth failure.
///
/// The last auth failure is returned once attempts are exhausted.
pub async fn retry_on_auth_failure<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: AuthFailure + Display,
{
    let tries = policy.tries.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if e.is_auth_failure() && attempt < tries => {
                warn!(
                    operation,
                    attempt,
                    tries,
                    error = %e,
                    "authentication failure, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
