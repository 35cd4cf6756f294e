use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Installs the console subscriber. `RUST_LOG` wins over `default_filter`.
/// Logs go to stderr so they stay out of the REPL's output.
pub fn init_tracing(default_filter: &str) {
    let console_fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(Format::default().compact().with_target(false).without_time());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_fmt)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(filter = default_filter, "Tracing initialized");
    }
}
