use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "cardsync=info,cardsync_core=info,cardsync_ingest=info,cardsync_ledger=info";

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
