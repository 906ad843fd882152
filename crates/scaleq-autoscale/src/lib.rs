//! scaleq-autoscale — queue-driven autoscale settings for scale sets.
//!
//! Ensures every scale set has exactly one autoscale setting, created on
//! first sight, whose profile follows the depth of the pool's work queue.
//!
//! # Rules
//!
//! ```text
//! metric = ApproximateMessageCount of the pool queue
//!
//! scale out: avg(count over 1m grains) in last 10m >  1  → +1, cooldown 5m
//! scale in:  avg(sum   over 10m grains) in last 10m == 0 → -1, cooldown 5m
//!
//! capacity: minimum = min, maximum = max, default = max
//! ```
//!
//! Existing settings are detected by the target resource URI ending with
//! the scale set id; a scale set that already has one is left untouched.
//! Authentication failures are retried with a fixed delay; every other
//! provider failure is folded into a local `Error`.

pub mod manager;
pub mod profile;
pub mod retry;

pub use manager::{AutoscaleManager, scaleset_resource_uri};
pub use profile::create_auto_scale_profile;
pub use retry::{AuthFailure, RetryPolicy, retry_on_auth_failure};
