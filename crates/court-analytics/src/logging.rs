//! Process-wide logger setup driven by [`LoggingConfig`].
//!
//! Library code only talks to the `log` facade (and emits `tracing` spans
//! with the `tracing` feature). Binaries install a backend here once, at
//! startup. A `RUST_LOG` variable, when set, takes precedence over the
//! configured levels.

use crate::{ConfigError, LoggingConfig};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("a global logger is already installed")]
    AlreadyInstalled,
}

/// `env_logger` builder for `config`; `directives` (`RUST_LOG` syntax) are
/// applied last.
fn logger_builder(
    config: &LoggingConfig,
    directives: Option<&str>,
) -> Result<env_logger::Builder, ConfigError> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.level_filter()?)
        .format_timestamp_millis()
        .format_target(true);
    for (target, level) in config.target_filters()? {
        builder.filter_module(target, level);
    }
    if let Some(directives) = directives {
        builder.parse_filters(directives);
    }
    Ok(builder)
}

/// Install `env_logger` on stderr as the `log` backend.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let directives = std::env::var("RUST_LOG").ok();
    logger_builder(config, directives.as_deref())?
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)
}

/// `EnvFilter` directives equivalent to `config`, e.g.
/// `info,court_analytics_events=debug`.
#[cfg(feature = "tracing")]
fn filter_directives(config: &LoggingConfig) -> Result<String, ConfigError> {
    let mut directives = config.level_filter()?.to_string().to_lowercase();
    for (target, level) in config.target_filters()? {
        directives.push_str(&format!(",{target}={}", level.to_string().to_lowercase()));
    }
    Ok(directives)
}

/// Install a `tracing` subscriber on stderr. `log` records are forwarded to
/// it, and span closings are reported with their timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: &LoggingConfig, json: bool) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = filter_directives(config)?;
            EnvFilter::try_new(&directives)
                .map_err(|_| ConfigError::InvalidLogLevel(directives))?
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
    installed.map_err(|_| LoggingError::AlreadyInstalled)
}
