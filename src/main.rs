//! cputray — CPU load, clock speed and temperature as a tiny tray icon.
//!
//! Run with:  `RUST_LOG=info cputray`

mod app;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("cputray v{} starting", env!("CARGO_PKG_VERSION"));

    app::run().await
}
