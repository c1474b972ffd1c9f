//! Logging setup for embedders.
//!
//! The library itself only emits `tracing` events and never installs a
//! subscriber on its own. Hosts that already run their own subscriber can
//! ignore this module entirely; hosts that want a ready-made setup call
//! [`init`] with [`LogOptions`] describing where output should go.
//!
//! # Example
//!
//! ```ignore
//! use waymark::logging::{self, LogOptions};
//!
//! let _guard = logging::init(&LogOptions::default().with_directory("logs"))?;
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Where log output goes.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Directory for the log file; `None` disables file output.
    pub directory: Option<PathBuf>,
    /// Log file name within `directory`.
    pub file_name: String,
    /// Whether events are mirrored to stdout.
    pub stdout: bool,
    /// Filter directives used when `RUST_LOG` is not set.
    pub fallback_filter: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "waymark.log".to_string(),
            stdout: true,
            fallback_filter: "info".to_string(),
        }
    }
}

impl LogOptions {
    /// Enables file output into the given directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Disables the stdout mirror.
    pub fn without_stdout(mut self) -> Self {
        self.stdout = false;
        self
    }
}

/// Errors from logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created
    #[error("Failed to prepare log directory: {0}")]
    Io(#[from] io::Error),

    /// Another global subscriber was installed first
    #[error("A tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Keeps the background log file writer alive.
///
/// Dropping the guard flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs a global tracing subscriber per the given options.
///
/// The log file is appended to, never truncated; rotation is left to the
/// host. Fails when another subscriber was installed first, so embedders
/// keep control over their own setup.
pub fn init(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.fallback_filter));

    let (file_layer, file_guard) = match &options.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, &options.file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = options
        .stdout
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stdout));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
