use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber: JSON lines on stdout, filtered by `RUST_LOG`
/// when set and by `log_level` otherwise.
///
/// Calling it twice is harmless; the second installation is skipped.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    match installed {
        Ok(()) => tracing::info!(service = %service_name, level = %log_level, "Tracing initialized"),
        Err(e) => eprintln!("Tracing for '{}' already initialized: {}", service_name, e),
    }
}
