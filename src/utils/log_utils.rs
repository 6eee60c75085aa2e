use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "salesboard=info,tower_http=info";

/// Installs the fmt subscriber. `log` records from the services are picked up
/// through the subscriber's log bridge. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
