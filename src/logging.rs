//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with command output. The filter is
//! taken from `SLEEPLOG_LOG` when set, otherwise from the configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::SleeplogError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SLEEPLOG_LOG";

/// Pick the filter directive: `-v` wins, then `SLEEPLOG_LOG`, then config.
#[must_use]
pub fn resolve_filter(configured: &str, verbose: bool, env_value: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }

    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(configured)
        .to_string()
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is malformed or a subscriber is
/// already installed.
pub fn init(configured: &str, verbose: bool) -> Result<(), SleeplogError> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = resolve_filter(configured, verbose, env_value.as_deref());

    let filter = EnvFilter::try_new(&directive).map_err(|e| {
        SleeplogError::Config(format!("Invalid log filter '{directive}': {e}"))
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| SleeplogError::Config(format!("Failed to initialize logging: {e}")))
}
