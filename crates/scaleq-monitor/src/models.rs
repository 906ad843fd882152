//! Autoscale-setting resources in their ARM JSON shape.
//!
//! Field names are camelCase on the wire. Counts that ARM transports as
//! strings (`capacity.*`, `scaleAction.value`) are plain integers here.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named capacity range plus the rules that move within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleProfile {
    pub name: String,
    pub capacity: ScaleCapacity,
    #[serde(default)]
    pub rules: Vec<ScaleRule>,
}

/// Instance-count bounds. `default` is used when metrics are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleCapacity {
    #[serde(with = "count_string")]
    pub minimum: u32,
    #[serde(with = "count_string")]
    pub maximum: u32,
    #[serde(with = "count_string")]
    pub default: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRule {
    pub metric_trigger: MetricTrigger,
    pub scale_action: ScaleAction,
}

/// The metric condition that fires a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrigger {
    pub metric_name: String,
    pub metric_resource_uri: String,
    /// Granularity of the metric samples.
    #[serde(with = "crate::duration")]
    pub time_grain: Duration,
    /// How samples are combined within one time grain.
    pub statistic: MetricStatisticType,
    /// Look-back window the rule is evaluated over.
    #[serde(with = "crate::duration")]
    pub time_window: Duration,
    /// How time grains are combined across the window.
    pub time_aggregation: TimeAggregationType,
    pub operator: ComparisonOperationType,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleAction {
    pub direction: ScaleDirection,
    #[serde(rename = "type")]
    pub scale_type: ScaleType,
    #[serde(with = "count_string")]
    pub value: u32,
    #[serde(with = "crate::duration")]
    pub cooldown: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatisticType {
    Average,
    Min,
    Max,
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAggregationType {
    Average,
    Minimum,
    Maximum,
    Total,
    Count,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperationType {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleDirection {
    None,
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleType {
    ChangeCount,
    PercentChangeCount,
    ExactCount,
}

// ── Resources ─────────────────────────────────────────────────────

/// An autoscale setting as returned by the management API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleSettingResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    pub properties: AutoscaleSetting,
}

impl AutoscaleSettingResource {
    /// The resource this setting scales, if any.
    pub fn target_resource_uri(&self) -> Option<&str> {
        self.properties.target_resource_uri.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscaleSetting {
    #[serde(default)]
    pub profiles: Vec<AutoscaleProfile>,
    #[serde(default)]
    pub notifications: Vec<serde_json::Value>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_resource_uri: Option<String>,
}

fn enabled_default() -> bool {
    true
}

/// Parameters for a create-or-update call.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoscaleSettingParams {
    pub location: String,
    pub profiles: Vec<AutoscaleProfile>,
    pub target_resource_uri: String,
    pub enabled: bool,
}

impl AutoscaleSettingParams {
    /// The PUT body ARM expects.
    pub fn to_request_body(&self) -> AutoscaleSettingRequest {
        AutoscaleSettingRequest {
            location: self.location.clone(),
            tags: BTreeMap::new(),
            properties: AutoscaleSetting {
                profiles: self.profiles.clone(),
                notifications: Vec::new(),
                enabled: self.enabled,
                name: None,
                target_resource_uri: Some(self.target_resource_uri.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleSettingRequest {
    pub location: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    pub properties: AutoscaleSetting,
}

/// One page of a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscaleSettingPage {
    #[serde(default)]
    pub value: Vec<AutoscaleSettingResource>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

// ── Count encoding ───────────────────────────────────────────────

/// ARM sends counts as `"3"`; tolerate bare numbers too.
mod count_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Count {
            Text(String),
            Number(u32),
        }

        match Count::deserialize(deserializer)? {
            Count::Number(n) => Ok(n),
            Count::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid count: {s}"))),
        }
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScaleDirection::None => "none",
            ScaleDirection::Increase => "increase",
            ScaleDirection::Decrease => "decrease",
        };
        f.write_str(s)
    }
}
