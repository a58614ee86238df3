use thiserror::Error;

/// A record the canonicalizer had to skip because a required value was
/// malformed. Recorded on the catalog, never fatal to the payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("row {row}: field `{field}` is not an integer: {value:?}")]
    InvalidInteger {
        row: usize,
        field: String,
        value: String,
    },

    #[error("row {row}: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },

    #[error("row {row}: timestamp `{field}` is out of range: {value}")]
    TimestampOutOfRange {
        row: usize,
        field: String,
        value: i64,
    },

    #[error("row {row}: counter column {value:?} is not `name=value`")]
    InvalidCounter { row: usize, value: String },

    #[error("payload is not a JSON list: {reason}")]
    MalformedBlob { reason: String },
}

impl ParseError {
    /// Index of the offending row, `None` for payload-level failures.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::InvalidInteger { row, .. }
            | Self::InvalidNumber { row, .. }
            | Self::TimestampOutOfRange { row, .. }
            | Self::InvalidCounter { row, .. } => Some(*row),
            Self::MalformedBlob { .. } => None,
        }
    }
}
