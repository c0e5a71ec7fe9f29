//! Log output for the host process.
//!
//! Limiters never log. The host builds a `Dispatch` here and installs it for
//! its own scope with `tracing::dispatcher::with_default`, so nothing in the
//! library depends on a process-wide subscriber.
use tracing::Dispatch;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::settings::{LogFormat, LogSettings};

/// `RUST_LOG` wins when set, otherwise the configured level applies
pub fn env_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.level.to_string()))
}

/// Build a logging handle. Output goes to stderr; stdout is left to the
/// replay decisions.
pub fn dispatch(settings: &LogSettings) -> Dispatch {
    let filter = env_filter(settings);
    let registry = tracing_subscriber::registry().with(filter);
    match settings.format {
        LogFormat::Text => Dispatch::new(registry.with(fmt::layer().with_writer(std::io::stderr))),
        LogFormat::Json => Dispatch::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    }
}
