//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize console tracing.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` for this crate.
/// Safe to call once per process; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("planning_engine=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
