//! Error types for the management API surface.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for management API calls.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors surfaced by an [`AutoscaleSettingsApi`](crate::AutoscaleSettingsApi)
/// implementation or a [`TokenProvider`](crate::TokenProvider).
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The credential was rejected or could not be obtained.
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other non-success response from the management API.
    #[error("cloud error ({status}) {code}: {message}")]
    Cloud {
        status: u16,
        code: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),
}

impl MonitorError {
    /// True when retrying with a fresh credential may succeed.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, MonitorError::Authentication(_))
    }

    /// Classify a non-success ARM response from its status and body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (String::new(), body.trim().to_string()),
        };

        match (status, code.as_str()) {
            (401, _) | (_, "InvalidAuthenticationToken") | (_, "ExpiredAuthenticationToken") => {
                MonitorError::Authentication(if message.is_empty() { code } else { message })
            }
            (404, _) | (_, "ResourceNotFound") | (_, "ResourceGroupNotFound") => {
                MonitorError::NotFound(if message.is_empty() { code } else { message })
            }
            _ => MonitorError::Cloud {
                status,
                code: if code.is_empty() { "Unknown".to_string() } else { code },
                message,
            },
        }
    }
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}
