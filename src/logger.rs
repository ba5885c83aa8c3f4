use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global subscriber. `ITSCTL_LOG` wins over `RUST_LOG`;
/// output goes to stderr so stdout only carries the outcome.
pub(crate) fn init_logging(verbose: bool, no_color: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("ITSCTL_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(fallback),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
