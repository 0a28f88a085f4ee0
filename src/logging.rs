//! Logging Facility
//!
//! Each named component (`router`, `prompts`, `cli`) gets its own [`Logger`]
//! handle. A handle owns a `tracing` dispatcher with a plain-text file layer
//! and, when streaming is enabled, a colored stderr layer. Handles are passed
//! into constructors explicitly; nothing is installed as the global default.

use crate::utils::error::{AppError, AppResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Environment variable that overrides the configured log filter
pub const LOG_ENV: &str = "MNCTL_LOG";

/// Default level filter when neither the environment nor the config set one
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Leveled logger bound to one component and one destination file
#[derive(Clone)]
pub struct Logger {
    component: String,
    file: PathBuf,
    stream: bool,
    dispatch: Dispatch,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.component)
            .field("file", &self.file)
            .field("stream", &self.stream)
            .finish()
    }
}

impl Logger {
    /// Create a logger writing to `file`, creating its parent directory first.
    pub fn new(component: &str, file: &Path, stream: bool, level: &str) -> AppResult<Self> {
        if let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Io(format!(
                    "Failed to create log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .map_err(|e| AppError::Io(format!("Failed to open log file {}: {}", file.display(), e)))?;

        let file_layer = fmt::layer()
            .with_target(false)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_writer(Mutex::new(log_file));

        let console_layer = stream.then(|| {
            fmt::layer()
                .with_target(false)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_writer(std::io::stderr)
        });

        let subscriber = Registry::default()
            .with(build_filter(level)?)
            .with(file_layer)
            .with(console_layer);

        Ok(Self {
            component: component.to_string(),
            file: file.to_path_buf(),
            stream,
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// A logger that discards everything, for contexts with no destination yet
    pub fn disabled(component: &str) -> Self {
        Self {
            component: component.to_string(),
            file: PathBuf::new(),
            stream: false,
            dispatch: Dispatch::none(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    /// Emit `message` at `level` through this component's sinks
    pub fn log(&self, level: Level, message: &str) {
        let component = self.component.as_str();
        tracing::dispatcher::with_default(&self.dispatch, || {
            if level == Level::ERROR {
                tracing::error!(component, "{}", message);
            } else if level == Level::WARN {
                tracing::warn!(component, "{}", message);
            } else if level == Level::INFO {
                tracing::info!(component, "{}", message);
            } else if level == Level::DEBUG {
                tracing::debug!(component, "{}", message);
            } else {
                tracing::trace!(component, "{}", message);
            }
        });
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Build the level filter: `MNCTL_LOG` wins over the configured level
fn build_filter(level: &str) -> AppResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }

    let level = if level.trim().is_empty() {
        DEFAULT_LOG_LEVEL
    } else {
        level
    };

    EnvFilter::try_new(level)
        .map_err(|e| AppError::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// One logger per named component, rebuilt as a unit on every config reload
#[derive(Debug, Clone)]
pub struct ComponentLoggers {
    pub router: Logger,
    pub prompts: Logger,
    pub cli: Logger,
}

impl ComponentLoggers {
    pub fn new(
        router_log: &Path,
        prompts_log: &Path,
        cli_log: &Path,
        stream: bool,
        level: &str,
    ) -> AppResult<Self> {
        Ok(Self {
            router: Logger::new("router", router_log, stream, level)?,
            prompts: Logger::new("prompts", prompts_log, stream, level)?,
            cli: Logger::new("cli", cli_log, stream, level)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_to_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("log").join("router.log");
        let logger = Logger::new("router", &path, false, "debug").unwrap();

        logger.info("router initialized");
        logger.error("something failed");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("router initialized"));
        assert!(content.contains("something failed"));
        assert!(content.contains("INFO"));
        assert!(content.contains("ERROR"));
        assert!(content.contains("component=\"router\""));
    }

    #[test]
    fn test_level_filter_drops_lower_levels() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("prompts.log");
        let logger = Logger::new("prompts", &path, false, "warn").unwrap();

        logger.debug("hidden detail");
        logger.warn("visible warning");

        let content = std::fs::read_to_string(&path).unwrap();
        if std::env::var(LOG_ENV).is_err() {
            assert!(!content.contains("hidden detail"));
        }
        assert!(content.contains("visible warning"));
    }

    #[test]
    fn test_component_loggers_use_separate_files() {
        let temp = tempfile::tempdir().unwrap();
        let loggers = ComponentLoggers::new(
            &temp.path().join("router.log"),
            &temp.path().join("prompts.log"),
            &temp.path().join("cli.log"),
            false,
            "debug",
        )
        .unwrap();

        loggers.cli.info("from cli");

        let cli = std::fs::read_to_string(temp.path().join("cli.log")).unwrap();
        let router = std::fs::read_to_string(temp.path().join("router.log")).unwrap();
        assert!(cli.contains("from cli"));
        assert!(!router.contains("from cli"));
        assert_eq!(loggers.prompts.component(), "prompts");
    }
}
