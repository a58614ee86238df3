use serde::Serialize;

use nsxcheck_common::render;
use nsxcheck_common::Severity;

/// How a measurement is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    /// Seconds, shown as `2 days 3 hours`.
    Timespan,
    /// Whole days, shown as the bare integer.
    Days,
    Percent,
    Bytes,
    Float,
}

impl Render {
    pub fn apply(&self, value: f64) -> String {
        match self {
            Self::Timespan => render::timespan(value),
            Self::Days => format!("{}", value.trunc() as i64),
            Self::Percent => render::percent(value),
            Self::Bytes => render::bytes(value),
            Self::Float => format!("{value:.2}"),
        }
    }
}

/// Lower/upper limits of a metric's value range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
    /// Warning and critical levels, when a threshold is configured.
    pub levels: Option<(f64, f64)>,
    pub bounds: MetricBounds,
    pub render: Render,
}

/// One graded line of a verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<Metric>,
}

impl Finding {
    pub fn new(severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            metric: None,
        }
    }

    pub fn ok(summary: impl Into<String>) -> Self {
        Self::new(Severity::Ok, summary)
    }

    pub fn crit(summary: impl Into<String>) -> Self {
        Self::new(Severity::Crit, summary)
    }

    pub fn unknown(summary: impl Into<String>) -> Self {
        Self::new(Severity::Unknown, summary)
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = Some(metric);
        self
    }

    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.summary = format!("{prefix}{}", self.summary);
        self
    }
}

/// Ordered findings for one entity in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Verdict {
    findings: Vec<Finding>,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Overall state; `None` for an empty verdict.
    pub fn state(&self) -> Option<Severity> {
        self.findings
            .iter()
            .map(|f| f.severity)
            .reduce(Severity::worst)
    }

    pub fn summaries(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.summary.as_str()).collect()
    }
}

impl Extend<Finding> for Verdict {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        self.findings.extend(iter);
    }
}

impl FromIterator<Finding> for Verdict {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self {
            findings: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Verdict {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_verdict_has_no_state() {
        assert_eq!(Verdict::new().state(), None);
    }

    #[test]
    fn state_is_worst_finding() {
        let v: Verdict = vec![
            Finding::ok("a"),
            Finding::new(Severity::Warn, "b"),
            Finding::unknown("c"),
        ]
        .into_iter()
        .collect();
        assert_eq!(v.state(), Some(Severity::Unknown));

        let mut v2 = v.clone();
        v2.push(Finding::crit("d"));
        assert_eq!(v2.state(), Some(Severity::Crit));
    }

    #[test]
    fn prefix_keeps_severity() {
        let f = Finding::crit("expired").prefixed("[node-a]: ");
        assert_eq!(f.summary, "[node-a]: expired");
        assert_eq!(f.severity, Severity::Crit);
    }

    #[test]
    fn render_days_truncates() {
        assert_eq!(Render::Days.apply(5.9), "5");
        assert_eq!(Render::Float.apply(0.5), "0.50");
    }

    #[test]
    fn finding_json_omits_missing_metric() {
        let json = serde_json::to_value(Finding::ok("ID: x")).unwrap();
        assert_eq!(json["severity"], "OK");
        assert!(json.get("metric").is_none());
    }
}
