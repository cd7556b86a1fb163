//! File logging. The terminal belongs to the UI, so nothing may be written
//! to stdout or stderr while it runs.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("askbox")
        .join("askbox.log")
}

/// `RUST_LOG` wins over the verbosity flag when set
fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("askbox={lvl},askbox_core={lvl}", lvl = default_level))
    })
}

/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the writer thread.
pub fn init(path: &Path, verbose: bool) -> Result<WorkerGuard> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    tracing::info!("askbox logging to {}", path.display());
    Ok(guard)
}

/// Like [`init`], but a log file that cannot be opened only costs the
/// logs. The warning goes to stderr while the terminal is still ours.
pub fn init_or_warn(path: &Path, verbose: bool) -> Option<WorkerGuard> {
    match init(path, verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("askbox: logging disabled, cannot write {}: {:#}", path.display(), e);
            None
        }
    }
}
