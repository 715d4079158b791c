// src/logging.rs
// =============================================================================
// Sets up the global tracing subscriber.
//
// Logs go to stderr so `--json` output on stdout stays clean for pipes.
// RUST_LOG, when set, wins over the --log-level flag.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("link_sentry={}", default_level)));

    // try_init: a second call (e.g. from tests) is a no-op instead of a panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
