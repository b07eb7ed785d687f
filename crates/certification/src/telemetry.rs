use crate::config::{LogStyle, TelemetryConfig};
use std::env;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("CERT_LOG_LEVEL '{value}' is not a valid log filter")]
    InvalidLevel {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("unable to install the log subscriber: {0}")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. Logs go to stderr so the roster summary
/// printed on stdout can be piped on its own.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = env::var("RUST_LOG").ok();
    let filter = log_filter(config, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    let installed = match config.style {
        LogStyle::Compact => builder.with_target(false).compact().try_init(),
        LogStyle::Detailed => builder.with_target(true).with_line_number(true).try_init(),
    };
    installed.map_err(TelemetryError::Install)
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn log_filter(
    config: &TelemetryConfig,
    rust_log: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidLevel {
        value: config.log_level.clone(),
        source,
    })
}
