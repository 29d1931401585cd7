//! Tracing subscriber setup for binaries embedding the runtime.
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Optional log file as `(directory, file name)`, written without rotation.
    pub file: Option<(PathBuf, String)>,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_owned(),
            file: None,
            ansi: true,
        }
    }
}

impl LogConfig {
    pub fn with_file(mut self, directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        self.file = Some((directory.into(), name.into()));
        self
    }
}

/// Installs the global subscriber: stderr always, plus a non-blocking file
/// layer when configured.
///
/// Keep the returned guard alive for as long as file output is needed. A
/// second call leaves the first subscriber in place.
pub fn init(config: LogConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false);

    let (file_layer, guard) = match &config.file {
        Some((directory, name)) => {
            let appender = tracing_appender::rolling::never(directory, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    guard
}
