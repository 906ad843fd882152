//! The queue-depth autoscale profile.

use std::time::Duration;

use uuid::Uuid;

use scaleq_monitor::{
    AutoscaleProfile, ComparisonOperationType, MetricStatisticType, MetricTrigger, ScaleAction,
    ScaleCapacity, ScaleDirection, ScaleRule, ScaleType, TimeAggregationType,
};

/// Queue metric the rules are driven by.
pub const QUEUE_METRIC: &str = "ApproximateMessageCount";

pub const SCALE_OUT_TIME_GRAIN: Duration = Duration::from_secs(60);
pub const SCALE_IN_TIME_GRAIN: Duration = Duration::from_secs(10 * 60);
pub const RULE_TIME_WINDOW: Duration = Duration::from_secs(10 * 60);
pub const RULE_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Scale out while more than this many messages wait.
pub const SCALE_OUT_THRESHOLD: f64 = 1.0;
/// Scale in once the queue has been empty for a whole window.
pub const SCALE_IN_THRESHOLD: f64 = 0.0;

/// Build a profile that grows the pool by one node while work is queued
/// and shrinks it by one once the queue has been idle for ten minutes.
///
/// Capacity defaults to `max` so a pool without metrics stays fully
/// provisioned.
pub fn create_auto_scale_profile(min: u32, max: u32, queue_uri: &str) -> AutoscaleProfile {
    AutoscaleProfile {
        name: Uuid::new_v4().to_string(),
        capacity: ScaleCapacity {
            minimum: min,
            maximum: max,
            default: max,
        },
        rules: vec![scale_out_rule(queue_uri), scale_in_rule(queue_uri)],
    }
}

fn scale_out_rule(queue_uri: &str) -> ScaleRule {
    ScaleRule {
        metric_trigger: MetricTrigger {
            metric_name: QUEUE_METRIC.to_string(),
            metric_resource_uri: queue_uri.to_string(),
            time_grain: SCALE_OUT_TIME_GRAIN,
            statistic: MetricStatisticType::Count,
            time_window: RULE_TIME_WINDOW,
            time_aggregation: TimeAggregationType::Average,
            operator: ComparisonOperationType::GreaterThan,
            threshold: SCALE_OUT_THRESHOLD,
        },
        scale_action: ScaleAction {
            direction: ScaleDirection::Increase,
            scale_type: ScaleType::ChangeCount,
            value: 1,
            cooldown: RULE_COOLDOWN,
        },
    }
}

fn scale_in_rule(queue_uri: &str) -> ScaleRule {
    ScaleRule {
        metric_trigger: MetricTrigger {
            metric_name: QUEUE_METRIC.to_string(),
            metric_resource_uri: queue_uri.to_string(),
            time_grain: SCALE_IN_TIME_GRAIN,
            statistic: MetricStatisticType::Sum,
            time_window: RULE_TIME_WINDOW,
            time_aggregation: TimeAggregationType::Average,
            operator: ComparisonOperationType::Equals,
            threshold: SCALE_IN_THRESHOLD,
        },
        scale_action: ScaleAction {
            direction: ScaleDirection::Decrease,
            scale_type: ScaleType::ChangeCount,
            value: 1,
            cooldown: RULE_COOLDOWN,
        },
    }
}
