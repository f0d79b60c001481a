use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

/// Installs the JSON log subscriber used by the Lambda binaries.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once keeps the first subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = fmt()
        .json()
        .with_env_filter(filter)
        .with_target(false)
        .with_current_span(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(component = "logging", event = "logger_initialized");
    }
}
