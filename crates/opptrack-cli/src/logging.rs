use tracing_subscriber::EnvFilter;

use crate::args::LogLevel;

/// Log to stderr at `level`; `RUST_LOG` takes precedence when set
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "opptrack={level},opptrack_runtime={level},opptrack_store={level}"
        ))
    });

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
