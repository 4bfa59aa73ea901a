pub mod ai;
pub mod backend;
pub mod config;
pub mod probe;
pub mod report;
pub mod setup;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so that report output on stdout stays clean.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
