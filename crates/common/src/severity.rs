use serde::{Deserialize, Serialize};
use std::fmt;

/// Grade of a single finding.
///
/// `Ok`, `Warn` and `Crit` are ordered by badness. `Unknown` sits outside that
/// order: it means "could not be graded", not "worse than critical".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warn,
    Crit,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Crit => "CRIT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Monitoring state code (0 OK, 1 WARN, 2 CRIT, 3 UNKNOWN).
    pub fn code(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warn => 1,
            Self::Crit => 2,
            Self::Unknown => 3,
        }
    }

    /// Position on the OK < WARN < CRIT scale, `None` for `Unknown`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Ok => Some(0),
            Self::Warn => Some(1),
            Self::Crit => Some(2),
            Self::Unknown => None,
        }
    }

    /// Combines two grades: CRIT beats UNKNOWN beats WARN beats OK.
    pub fn worst(self, other: Self) -> Self {
        fn weight(s: Severity) -> u8 {
            match s {
                Severity::Ok => 0,
                Severity::Warn => 1,
                Severity::Unknown => 2,
                Severity::Crit => 3,
            }
        }
        if weight(other) > weight(self) {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
