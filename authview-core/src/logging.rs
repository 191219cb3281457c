use tracing_subscriber::EnvFilter;

use crate::login::{LogLevel, LoginConfig};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// The `EnvFilter` directive used when `RUST_LOG` is not set.
pub fn default_directive(level: LogLevel) -> String {
    let level = level.tracing_level().as_str().to_ascii_lowercase();
    format!("{level},authview={level}")
}

/// Install the global `tracing` subscriber for an application using `config`.
///
/// `RUST_LOG` takes precedence over the configured log level. Calling this
/// twice is harmless: the second installation is skipped.
pub fn init_tracing(config: &LoginConfig, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.log_level)));

    let installed = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_target(true)
            .with_env_filter(env_filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(true)
            .with_env_filter(env_filter)
            .try_init(),
    };

    match installed {
        Ok(()) => tracing::debug!(
            level = config.log_level.as_str(),
            pii = config.pii_logging_enabled,
            "Tracing initialized"
        ),
        Err(_) => tracing::debug!("Tracing subscriber already installed"),
    }
}
