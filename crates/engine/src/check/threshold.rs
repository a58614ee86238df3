use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nsxcheck_common::Severity;

use super::finding::{Finding, Metric, MetricBounds, Render};

/// Warning and critical boundaries, written as `[warn, crit]` in config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Levels {
    pub warn: f64,
    pub crit: f64,
}

impl Levels {
    pub fn new(warn: f64, crit: f64) -> Self {
        Self { warn, crit }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.warn * factor, self.crit * factor)
    }
}

impl From<(f64, f64)> for Levels {
    fn from((warn, crit): (f64, f64)) -> Self {
        Self::new(warn, crit)
    }
}

impl From<Levels> for (f64, f64) {
    fn from(l: Levels) -> Self {
        (l.warn, l.crit)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ThresholdSpec {
    /// No check; never alarms.
    #[default]
    Absent,
    /// Alarm when the measurement reaches or exceeds a boundary.
    Upper(Levels),
    /// Alarm when the measurement reaches or falls below a boundary.
    Lower(Levels),
}

impl ThresholdSpec {
    pub fn upper(levels: Option<Levels>) -> Self {
        levels.map_or(Self::Absent, Self::Upper)
    }

    pub fn lower(levels: Option<Levels>) -> Self {
        levels.map_or(Self::Absent, Self::Lower)
    }

    pub fn levels(&self) -> Option<Levels> {
        match self {
            Self::Absent => None,
            Self::Upper(l) | Self::Lower(l) => Some(*l),
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Absent => Self::Absent,
            Self::Upper(l) => Self::Upper(l.scaled(factor)),
            Self::Lower(l) => Self::Lower(l.scaled(factor)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdOutcome {
    pub severity: Severity,
    pub rendered: String,
    /// `(warn/crit at W/C)` style note, only set when the boundary was hit.
    pub levels_text: Option<String>,
}

/// Grades `measurement` against `spec`. The critical boundary is checked
/// first so inverted levels still produce CRIT.
pub fn evaluate(measurement: f64, spec: &ThresholdSpec, render: Render) -> ThresholdOutcome {
    let rendered = render.apply(measurement);

    let (severity, note) = match spec {
        ThresholdSpec::Absent => (Severity::Ok, None),
        ThresholdSpec::Upper(l) => {
            let severity = if measurement >= l.crit {
                Severity::Crit
            } else if measurement >= l.warn {
                Severity::Warn
            } else {
                Severity::Ok
            };
            (severity, Some(("at", l)))
        }
        ThresholdSpec::Lower(l) => {
            let severity = if measurement <= l.crit {
                Severity::Crit
            } else if measurement <= l.warn {
                Severity::Warn
            } else {
                Severity::Ok
            };
            (severity, Some(("below", l)))
        }
    };

    let levels_text = match (severity, note) {
        (Severity::Warn | Severity::Crit, Some((word, l))) => Some(format!(
            "(warn/crit {word} {}/{})",
            render.apply(l.warn),
            render.apply(l.crit)
        )),
        _ => None,
    };

    ThresholdOutcome {
        severity,
        rendered,
        levels_text,
    }
}

/// Builds the threshold finding `<label>: <value> [(warn/crit ...)]`,
/// optionally carrying a metric.
pub fn check_levels(
    measurement: f64,
    spec: &ThresholdSpec,
    label: &str,
    render: Render,
    metric: Option<(&str, MetricBounds)>,
) -> Finding {
    let outcome = evaluate(measurement, spec, render);
    let summary = match &outcome.levels_text {
        Some(note) => format!("{label}: {} {note}", outcome.rendered),
        None => format!("{label}: {}", outcome.rendered),
    };

    let finding = Finding::new(outcome.severity, summary);
    match metric {
        Some((name, bounds)) => finding.with_metric(Metric {
            name: name.to_string(),
            value: measurement,
            levels: spec.levels().map(Into::into),
            bounds,
            render,
        }),
        None => finding,
    }
}

/// Finding for an expected data point that is missing entirely.
pub fn no_data(spec: &ThresholdSpec) -> Finding {
    if spec.is_configured() {
        Finding::crit("No data found")
    } else {
        Finding::ok("No data found and none needed")
    }
}

/// Seconds elapsed between `then` and `now`.
pub fn age_seconds(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    (now - then).num_milliseconds() as f64 / 1000.0
}

/// Whole days from `now` until `expiry`, truncated toward zero.
pub fn days_remaining(now: DateTime<Utc>, expiry: DateTime<Utc>) -> i64 {
    (expiry - now).num_days()
}
