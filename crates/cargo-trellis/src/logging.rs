//! Structured logging for the CLI.
//!
//! Logs go to stderr so listings on stdout stay machine-readable. Records
//! emitted by the engine through the `log` facade are bridged into the same
//! subscriber.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `TRELLIS_LOG_LEVEL`
/// 3. `warn`
///
/// A subscriber that is already installed is left in place.
pub fn init_logging(config: &CliConfig) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .finish();

    // The first subscriber wins.
    let _ = subscriber.try_init();
}
