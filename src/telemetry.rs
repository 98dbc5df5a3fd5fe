//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "medbook_client=info";

/// Builds the filter: `RUST_LOG`, then the configured level, then the default.
///
/// An unparsable configured level falls back to the default.
pub fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        configured
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Initialize the logging system.
///
/// # Panics
///
/// Panics if another tracing subscriber has already been set.
pub fn init(configured: Option<&str>) {
    tracing_subscriber::registry()
        .with(filter(configured))
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
