//! scaleq-core — types shared by every scaleq crate.
//!
//! Holds the scale-set and region identifiers, the local `Error` value
//! returned from orchestration calls, and the `scaleq.toml` loader.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AuthConfig, AzureConfig, RetryConfig, ScaleqConfig};
pub use error::{Error, ErrorCode};
pub use types::*;
