//! The local error value returned by orchestration calls.
//!
//! Provider failures never leak out of the orchestration layer as-is; they
//! are folded into an [`Error`] carrying a stable [`ErrorCode`] and one or
//! more human-readable messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable error codes shared with the rest of the fleet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    InvalidConfiguration,
    UnableToCreate,
    VmCreateFailed,
    Unauthorized,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorCode::UnableToCreate => "UNABLE_TO_CREATE",
            ErrorCode::VmCreateFailed => "VM_CREATE_FAILED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error code plus the messages explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {}", .errors.join("; "))]
pub struct Error {
    pub code: ErrorCode,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            errors: vec![message.into()],
        }
    }

    pub fn with_errors(code: ErrorCode, errors: Vec<String>) -> Self {
        Self { code, errors }
    }
}
