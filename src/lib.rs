pub mod app; // Console frontend: lookup flow + chat loop
pub mod backend; // HTTP client for the assistant backend
pub mod config;
pub mod confidence; // Citation-to-confidence heuristic + labels
pub mod export; // Agent-log download
pub mod models;
pub mod session; // Client-side chat timeline state

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, falling back to the app default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
