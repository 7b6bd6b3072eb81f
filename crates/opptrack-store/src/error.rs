use std::fmt;

/// Result type for opptrack-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the store layer
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed (blob store)
    Io(std::io::Error),

    /// Stored data could not be decoded
    Decode(String),

    /// Domain validation failed
    Domain(opptrack_types::Error),

    /// Record does not exist
    NotFound { entity: &'static str, id: String },

    /// Id prefix matches more than one record
    Ambiguous(String),

    /// Blob path escapes the store root or is otherwise unusable
    InvalidPath(String),

    /// Database was written by a newer schema than this build understands
    SchemaTooNew { found: i32, supported: i32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => {
                let msg = err.to_string();
                if msg.contains("no such column") || msg.contains("no such table") {
                    write!(
                        f,
                        "Database schema mismatch: {}. Run `opptrack init` to create the schema.",
                        msg
                    )
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Decode(msg) => write!(f, "Decode error: {}", msg),
            Error::Domain(err) => write!(f, "{}", err),
            Error::NotFound { entity, id } => write!(f, "{} not found: {}", entity, id),
            Error::Ambiguous(prefix) => write!(
                f,
                "Ambiguous id prefix '{}': multiple records match",
                prefix
            ),
            Error::InvalidPath(path) => write!(f, "Invalid blob path: {}", path),
            Error::SchemaTooNew { found, supported } => write!(
                f,
                "Database schema version {} is newer than supported version {}",
                found, supported
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Domain(err) => Some(err),
            Error::Decode(_)
            | Error::NotFound { .. }
            | Error::Ambiguous(_)
            | Error::InvalidPath(_)
            | Error::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<opptrack_types::Error> for Error {
    fn from(err: opptrack_types::Error) -> Self {
        Error::Domain(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_error_message() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("no such column: sales_alignment".to_string()),
        );
        let err = Error::Database(sqlite_err);
        let msg = err.to_string();

        assert!(msg.contains("Database schema mismatch"));
        assert!(msg.contains("opptrack init"));
    }

    #[test]
    fn test_regular_database_error_message() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("UNIQUE constraint failed".to_string()),
        );
        let err = Error::Database(sqlite_err);
        let msg = err.to_string();

        assert!(msg.starts_with("Database error:"));
        assert!(!msg.contains("opptrack init"));
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            entity: "Opportunity",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Opportunity not found: 42");
    }
}
