//! Tracing configuration and log routing.
//!
//! The server logs to stdout using a compact formatter. When `ARTVAULT_LOG_FILE`
//! is set, logs are also appended to that path through a non‑blocking writer so
//! request handlers never wait on disk.
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and optional file logging.
///
/// Respects `RUST_LOG` for filtering (defaults to `info`). The worker guard for
/// the file writer is held for the process lifetime.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact());

    let file_writer = std::env::var("ARTVAULT_LOG_FILE").ok().and_then(|path| {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path);
        match file {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let _ = LOG_GUARD.set(guard);
                Some(writer)
            }
            Err(err) => {
                eprintln!("Failed to open log file {path}: {err}");
                None
            }
        }
    });

    match file_writer {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        None => registry.init(),
    }
}
