use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins; otherwise `info`,
/// with per-request spans from tower-http at `debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    // A second init (tests, embedding) is not an error worth surfacing
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
