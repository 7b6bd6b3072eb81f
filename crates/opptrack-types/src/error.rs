use std::fmt;

/// Result type for opptrack-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised while validating or parsing domain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Phase outside the 0..=4 range
    InvalidPhase(i64),

    /// Unknown status name
    UnknownStatus(String),

    /// Unknown indicator name
    UnknownIndicator(String),

    /// Unknown inline-editable field name
    UnknownField(String),

    /// A value that could not be parsed for the given field
    InvalidValue { field: String, value: String },

    /// Demo link label contains the `|` separator
    LabelContainsSeparator(String),

    /// Index out of range for a list edit
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPhase(p) => write!(f, "Invalid phase {}: expected 0-4", p),
            Error::UnknownStatus(s) => write!(
                f,
                "Unknown status '{}': expected done, in_progress, paused, planned or not_go",
                s
            ),
            Error::UnknownIndicator(s) => {
                write!(f, "Unknown indicator '{}': expected green, amber or red", s)
            }
            Error::UnknownField(s) => write!(f, "Unknown field '{}'", s),
            Error::InvalidValue { field, value } => {
                write!(f, "Invalid value '{}' for field '{}'", value, field)
            }
            Error::LabelContainsSeparator(label) => write!(
                f,
                "Demo link label '{}' must not contain the '|' character",
                label
            ),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (list has {} entries)", index, len)
            }
        }
    }
}

impl std::error::Error for Error {}
