use std::fmt;

/// Result type for opptrack-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Record or blob store error
    Store(opptrack_store::Error),

    /// Domain validation failed
    Domain(opptrack_types::Error),

    /// Listing opportunities failed; the caller may retry
    Fetch(opptrack_store::Error),

    /// Blob was written but its metadata row was not
    Upload {
        path: String,
        source: opptrack_store::Error,
        orphaned: bool,
    },

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Input rejected before reaching the store
    Validation(String),

    /// Lookup by id, prefix or slug found nothing
    NotFound(String),

    /// File watcher could not be started
    Watch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "{}", err),
            Error::Domain(err) => write!(f, "{}", err),
            Error::Fetch(err) => write!(
                f,
                "Failed to load opportunities: {}. Retry the command.",
                err
            ),
            Error::Upload {
                path,
                source,
                orphaned,
            } => {
                write!(f, "Failed to record attachment {}: {}", path, source)?;
                if *orphaned {
                    write!(f, " (uploaded blob could not be removed)")?;
                }
                Ok(())
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Watch(msg) => write!(f, "Watch error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) | Error::Fetch(err) => Some(err),
            Error::Upload { source, .. } => Some(source),
            Error::Domain(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::Validation(_) | Error::NotFound(_) | Error::Watch(_) => None,
        }
    }
}

impl From<opptrack_store::Error> for Error {
    fn from(err: opptrack_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<opptrack_types::Error> for Error {
    fn from(err: opptrack_types::Error) -> Self {
        Error::Domain(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}
