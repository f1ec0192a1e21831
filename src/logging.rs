//! Logging setup for the demo application.
//!
//! Installs a global tracing subscriber writing to stdout, filtered by
//! `RUST_LOG` (default `info`).

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Another subscriber was installed by someone else.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing. Subsequent calls are no-ops.
pub fn init() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let subscriber = Registry::default()
        .with(build_env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stdout));
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(());
    tracing::debug!("Logging initialized");
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

