//! Logging initialization.

use tracing_subscriber::EnvFilter;

use crate::config::observability::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber according to the logging settings.
pub(crate) fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
