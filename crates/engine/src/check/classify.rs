//! Raw status and enabled codes to severities.
//!
//! Anything not listed in a table classifies as UNKNOWN and keeps the raw
//! code in its text.

use nsxcheck_common::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: &'static str,
    pub severity: Severity,
    pub label: &'static str,
}

const fn entry(code: &'static str, severity: Severity, label: &'static str) -> CodeEntry {
    CodeEntry {
        code,
        severity,
        label,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTable {
    name: &'static str,
    entries: &'static [CodeEntry],
}

impl CodeTable {
    pub const fn new(name: &'static str, entries: &'static [CodeEntry]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn lookup(&self, code: &str) -> Option<&CodeEntry> {
        self.entries.iter().find(|e| e.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    /// Table label for known codes, `unknown[<code>]` otherwise.
    pub text: String,
    pub recognized: bool,
}

pub fn classify(raw: &str, table: &CodeTable) -> Classification {
    match table.lookup(raw) {
        Some(e) => Classification {
            severity: e.severity,
            text: e.label.to_string(),
            recognized: true,
        },
        None => {
            tracing::debug!(table = table.name(), code = raw, "unrecognized code");
            Classification {
                severity: Severity::Unknown,
                text: format!("unknown[{raw}]"),
                recognized: false,
            }
        }
    }
}

pub const LOADBALANCER_ENABLED: CodeTable = CodeTable::new(
    "loadbalancer_enabled",
    &[
        entry("True", Severity::Ok, "enabled"),
        entry("False", Severity::Crit, "disabled"),
    ],
);

pub const VSERVER_ENABLED: CodeTable = CodeTable::new(
    "vserver_enabled",
    &[
        entry("True", Severity::Ok, "enabled"),
        entry("False", Severity::Warn, "disabled"),
    ],
);

pub const LOADBALANCER_STATUS: CodeTable = CodeTable::new(
    "loadbalancer_status",
    &[
        entry("UP", Severity::Ok, "UP"),
        entry("DISABLED", Severity::Crit, "DISABLED"),
    ],
);

/// Shared by pools and virtual servers.
pub const MEMBER_STATUS: CodeTable = CodeTable::new(
    "member_status",
    &[
        entry("UP", Severity::Ok, "UP"),
        entry("PARTIALLY_UP", Severity::Warn, "PARTIALLY_UP"),
        entry("DOWN", Severity::Crit, "DOWN"),
        entry("DISABLED", Severity::Warn, "DISABLED"),
    ],
);

pub const EDGE_STATUS: CodeTable = CodeTable::new(
    "edge_status",
    &[
        entry("UP", Severity::Ok, "UP"),
        entry("DOWN", Severity::Crit, "DOWN"),
    ],
);
