mod classify;
mod emit;
mod finding;
mod threshold;

pub use classify::{
    classify, Classification, CodeEntry, CodeTable, EDGE_STATUS, LOADBALANCER_ENABLED,
    LOADBALANCER_STATUS, MEMBER_STATUS, VSERVER_ENABLED,
};
pub use emit::{check, check_entity};
pub use finding::{Finding, Metric, MetricBounds, Render, Verdict};
pub use threshold::{
    age_seconds, check_levels, days_remaining, evaluate, no_data, Levels, ThresholdOutcome,
    ThresholdSpec,
};

use chrono::{DateTime, Utc};

/// Threshold rulesets, one per measured quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckParams {
    /// Seconds since the last backup started.
    pub backup_age: ThresholdSpec,
    /// Days of certificate validity left.
    pub certificate_validity: ThresholdSpec,
    /// Percent of RAM in use.
    pub memory_used: ThresholdSpec,
    /// 15 minute load per core.
    pub cpu_load: ThresholdSpec,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            backup_age: ThresholdSpec::Upper(Levels::new(93_600.0, 180_000.0)),
            certificate_validity: ThresholdSpec::Lower(Levels::new(25.0, 10.0)),
            memory_used: ThresholdSpec::Upper(Levels::new(80.0, 90.0)),
            cpu_load: ThresholdSpec::Upper(Levels::new(5.0, 10.0)),
        }
    }
}

/// Everything a check reads besides the entity itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckContext {
    pub now: DateTime<Utc>,
    pub params: CheckParams,
}

impl CheckContext {
    pub fn new(now: DateTime<Utc>, params: CheckParams) -> Self {
        Self { now, params }
    }
}
