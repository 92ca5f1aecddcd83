//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    tracing::debug!(app = %config.app_name, "Logging initialized");
}
