use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "info,image_editor=debug";

/// Installs a stderr subscriber filtered by `RUST_LOG`. Calling it again, or
/// after the host installed its own subscriber, does nothing.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("global tracing subscriber already set");
    }
}
