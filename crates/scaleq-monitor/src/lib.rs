//! scaleq-monitor — the Azure Monitor autoscale-settings surface.
//!
//! Provides the autoscale-setting data model in its ARM JSON wire format,
//! the [`AutoscaleSettingsApi`] seam the orchestration layer talks to, and
//! two implementations of it:
//!
//! - [`ArmMonitorClient`] — the management REST API over `reqwest`,
//!   authenticated with a [`TokenProvider`].
//! - [`InMemoryAutoscaleSettings`] — a process-local stand-in with
//!   injectable failures.
//!
//! # Wire format
//!
//! ```text
//! PUT {endpoint}/subscriptions/{sub}/resourceGroups/{rg}/providers/
//!     microsoft.insights/autoscalesettings/{name}?api-version=2015-04-01
//! {
//!   "location": "eastus",
//!   "properties": {
//!     "profiles": [{ "name": ..., "capacity": {"minimum": "0", ...}, "rules": [...] }],
//!     "targetResourceUri": "/subscriptions/.../virtualMachineScaleSets/{vmss}",
//!     "enabled": true,
//!     "notifications": []
//!   }
//! }
//! ```
//!
//! Capacity counts and action values travel as decimal strings; time
//! spans travel as ISO-8601 durations (`PT1M`, `PT10M`).

pub mod api;
pub mod auth;
pub mod client;
pub mod duration;
pub mod error;
pub mod memory;
pub mod models;

pub use api::AutoscaleSettingsApi;
pub use auth::{ClientSecretCredential, StaticToken, TokenProvider, token_provider_from_config};
pub use client::ArmMonitorClient;
pub use error::{MonitorError, MonitorResult};
pub use memory::InMemoryAutoscaleSettings;
pub use models::*;
