//! Logging System
//!
//! Structured logging through `tracing`. Logs always go to stderr so stdout
//! stays clean for command output (including `--json`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{TetherError, TetherResult};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "TETHER_LOG";

/// Install the global subscriber.
///
/// `TETHER_LOG` wins over the configured level. `verbose` raises the crate's
/// own events to `debug` on top of whatever filter is in effect.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> TetherResult<()> {
    let mut filter = build_env_filter(config)?;
    if verbose {
        filter = filter.add_directive(parse_directive("tether=debug")?);
    }

    let base = Registry::default().with(filter);
    let result = match config.format {
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(is_terminal::is_terminal(std::io::stderr()))
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| TetherError::validation(format!("failed to install logger: {e}")))
}

fn build_env_filter(config: &LoggingConfig) -> TetherResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        TetherError::validation(format!("invalid log level '{}': {e}", config.level))
    })
}

fn parse_directive(
    directive: &str,
) -> TetherResult<tracing_subscriber::filter::Directive> {
    directive
        .parse()
        .map_err(|e| TetherError::validation(format!("invalid log directive: {e}")))
}
