//! Tracing subscriber installation.

use estate_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, EnvFilter};

use crate::InfrastructureError;

/// Filter directives in effect: `RUST_LOG` when set, otherwise the
/// configured level
pub fn filter_directives(rust_log: Option<String>, config: &LoggingConfig) -> String {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let directives = filter_directives(std::env::var("RUST_LOG").ok(), config);
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| InfrastructureError::Logging(format!("invalid filter {:?}: {}", directives, e)))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| InfrastructureError::Logging(e.to_string()))
}
