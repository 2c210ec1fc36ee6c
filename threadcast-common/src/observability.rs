//! Process-wide `tracing` setup.
//!
//! Events go to a daily rolling file (`<app>.log.<YYYY-MM-DD>`) and, unless
//! disabled, to stderr as well. `RUST_LOG` overrides the default filter.
//! Only the first [`init_logging`] call installs anything; later calls return
//! the same file path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "THREADCAST_LOG_DIR";
const LOG_FORMAT_ENV: &str = "THREADCAST_LOG_FORMAT";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON, anything else is text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or(LogFormat::Text)
    }

    fn file_layer(self, writer: NonBlocking) -> BoxedLayer {
        match self {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        }
    }

    fn stderr_layer(self) -> BoxedLayer {
        match self {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used for the file name and the fallback directory.
    pub app_name: &'static str,
    /// Wins over `THREADCAST_LOG_DIR` and `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "threadcast",
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::from_env(),
            default_filter: "info",
        }
    }
}

impl LogConfig {
    fn directory(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return expand_home(dir);
        }
        match std::env::var(LOG_DIR_ENV) {
            Ok(dir) => expand_home(Path::new(&dir)),
            Err(_) => match std::env::var("HOME") {
                Ok(home) => PathBuf::from(home).join(".local/share").join(self.app_name),
                Err(_) => PathBuf::from(self.app_name),
            },
        }
    }

    fn file_prefix(&self) -> String {
        format!("{}.log", self.app_name)
    }
}

/// Install the global subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = config.directory();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

    let prefix = config.file_prefix();
    let path = dir.join(format!("{prefix}.{}", Local::now().format("%Y-%m-%d")));
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, prefix));

    let mut layers: Vec<BoxedLayer> = vec![config.format.file_layer(writer)];
    if config.emit_stderr {
        layers.push(config.format.stderr_layer());
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var("HOME")) {
        (Ok(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
