//! Router
//!
//! Front door for every user-visible operation. Holds the active
//! configuration, the component loggers, the note store and a lazily opened
//! Prompt Registry, and translates storage faults into absent results.

use crate::backend::GeminiClient;
use crate::config::{ConfigManager, Configuration, DefaultPaths, ResolvedPaths};
use crate::core::data::Note;
use crate::core::registry::PromptRegistry;
use crate::core::traits::{NoteStore, TextGenerator};
use crate::logging::{ComponentLoggers, DEFAULT_LOG_LEVEL, Logger};
use crate::utils::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inputs to configuration resolution
#[derive(Debug, Clone, Default)]
pub struct RouterSettings {
    /// Config file location; the default location when `None`
    pub config_path: Option<PathBuf>,
    /// In-memory configuration that wins over any file
    pub explicit: Option<Configuration>,
    pub defaults: DefaultPaths,
    /// Forces console streaming on or off regardless of the config
    pub stream_override: Option<bool>,
}

/// Snapshot of the active setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSummary {
    pub database_file: PathBuf,
    pub logger_file: PathBuf,
    pub stream_enabled: bool,
    pub config_valid: bool,
}

pub struct Router {
    config: ConfigManager,
    loggers: ComponentLoggers,
    store: Box<dyn NoteStore>,
    generator: Option<Arc<dyn TextGenerator>>,
    registry: Option<PromptRegistry>,
}

impl Router {
    pub fn new(settings: RouterSettings, store: Box<dyn NoteStore>) -> AppResult<Self> {
        let config = ConfigManager::load(
            settings.config_path,
            settings.explicit,
            settings.defaults,
            settings.stream_override,
        );
        config.ensure_directories()?;

        // An unparseable level falls back to the default at startup only
        let loggers = match build_loggers(config.paths(), &config.paths().log_level) {
            Ok(loggers) => loggers,
            Err(AppError::Config(reason)) => {
                let loggers = build_loggers(config.paths(), DEFAULT_LOG_LEVEL)?;
                loggers
                    .router
                    .warn(&format!("{}; falling back to '{}'", reason, DEFAULT_LOG_LEVEL));
                loggers
            }
            Err(e) => return Err(e),
        };
        loggers.router.info(&format!(
            "Router initialized with config {} (valid: {})",
            config.config_path().display(),
            config.is_valid()
        ));

        Ok(Self {
            config,
            loggers,
            store,
            generator: None,
            registry: None,
        })
    }

    /// Use `generator` for prompt execution instead of the configured backend
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self.registry = None;
        self
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn paths(&self) -> &ResolvedPaths {
        self.config.paths()
    }

    pub fn cli_logger(&self) -> &Logger {
        &self.loggers.cli
    }

    fn logger(&self) -> &Logger {
        &self.loggers.router
    }

    fn database(&self) -> &Path {
        &self.config.paths().database_file
    }

    // ========== Notes ==========

    /// Store a new note. `None` for empty content or a storage fault.
    pub fn new_note(&self, content: &str) -> Option<i64> {
        let content = content.trim();
        if content.is_empty() {
            self.logger().warn("Refusing to create an empty note");
            return None;
        }

        match self.store.create(self.database(), content) {
            Ok(id) => {
                self.logger().info(&format!("Created note {}", id));
                Some(id)
            }
            Err(e) => {
                self.logger().error(&format!("Failed to create note: {}", e));
                None
            }
        }
    }

    /// Every note in id order. `None` only on a storage fault.
    pub fn read_notes(&self) -> Option<Vec<Note>> {
        match self.store.read_all(self.database()) {
            Ok(notes) => {
                self.logger().debug(&format!("Read {} note(s)", notes.len()));
                Some(notes)
            }
            Err(e) => {
                self.logger().error(&format!("Failed to read notes: {}", e));
                None
            }
        }
    }

    /// Outer `None` on a storage fault, inner `None` when no note has `id`
    pub fn find_note(&self, id: i64) -> Option<Option<Note>> {
        let notes = self.read_notes()?;
        let note = notes.into_iter().find(|note| note.id == id);
        if note.is_none() {
            self.logger().debug(&format!("Note {} not found", id));
        }
        Some(note)
    }

    pub fn search_notes(&self, query: &str) -> Option<Vec<Note>> {
        let notes: Vec<Note> = self
            .read_notes()?
            .into_iter()
            .filter(|note| note.matches(query))
            .collect();
        self.logger().debug(&format!(
            "Search '{}' matched {} note(s)",
            query,
            notes.len()
        ));
        Some(notes)
    }

    /// `Some(false)` for empty content or an unknown id, `None` on a storage fault
    pub fn update_note(&self, id: i64, content: &str) -> Option<bool> {
        let content = content.trim();
        if content.is_empty() {
            self.logger()
                .warn(&format!("Refusing to update note {} with empty content", id));
            return Some(false);
        }

        match self.store.update(self.database(), id, content) {
            Ok(rows) => {
                if rows > 0 {
                    self.logger().info(&format!("Updated note {}", id));
                } else {
                    self.logger()
                        .warn(&format!("Update matched no note with id {}", id));
                }
                Some(rows > 0)
            }
            Err(e) => {
                self.logger()
                    .error(&format!("Failed to update note {}: {}", id, e));
                None
            }
        }
    }

    /// `Some(false)` for an unknown id, `None` on a storage fault
    pub fn delete_note(&self, id: i64) -> Option<bool> {
        match self.store.delete(self.database(), id) {
            Ok(rows) => {
                if rows > 0 {
                    self.logger().info(&format!("Deleted note {}", id));
                } else {
                    self.logger()
                        .warn(&format!("Delete matched no note with id {}", id));
                }
                Some(rows > 0)
            }
            Err(e) => {
                self.logger()
                    .error(&format!("Failed to delete note {}: {}", id, e));
                None
            }
        }
    }

    // ========== Configuration ==========

    pub fn summary(&self) -> RouterSummary {
        RouterSummary {
            database_file: self.database().to_path_buf(),
            logger_file: self.logger().file().to_path_buf(),
            stream_enabled: self.logger().stream(),
            config_valid: self.config.is_valid(),
        }
    }

    /// Reload configuration from `path`. On failure the active setup is kept.
    pub fn reload(&mut self, path: &Path) -> bool {
        let pending = match self.config.prepare_reload(path) {
            Ok(Some(pending)) => pending,
            Ok(None) => {
                self.logger()
                    .debug(&format!("Config {} unchanged", path.display()));
                return true;
            }
            Err(e) => {
                self.logger().error(&format!("Reload failed: {}", e));
                return false;
            }
        };

        let loggers = match build_loggers(&pending.paths, &pending.paths.log_level) {
            Ok(loggers) => loggers,
            Err(e) => {
                self.logger()
                    .error(&format!("Reload failed, cannot open loggers: {}", e));
                return false;
            }
        };

        self.config.commit(pending);
        self.loggers = loggers;
        self.registry = None;
        self.logger()
            .info(&format!("Reloaded config from {}", path.display()));
        true
    }

    /// Write the default configuration to `path`
    pub fn create_config_file(&self, path: &Path) -> bool {
        match self.config.write_default(path) {
            Ok(()) => {
                self.logger()
                    .info(&format!("Wrote default config to {}", path.display()));
                true
            }
            Err(e) => {
                self.logger()
                    .error(&format!("Cannot write default config: {}", e));
                false
            }
        }
    }

    // ========== Prompts ==========

    /// The Prompt Registry at the current prompts path, opened on first access
    pub fn prompts(&mut self) -> AppResult<&mut PromptRegistry> {
        let registry = match self.registry.take() {
            Some(registry) => registry,
            None => {
                let generator: Arc<dyn TextGenerator> = match &self.generator {
                    Some(generator) => Arc::clone(generator),
                    None => Arc::new(GeminiClient::new(&self.config.paths().model)?),
                };
                PromptRegistry::open(
                    &self.config.paths().prompts_file,
                    generator,
                    self.loggers.prompts.clone(),
                )?
            }
        };

        Ok(self.registry.insert(registry))
    }
}

fn build_loggers(paths: &ResolvedPaths, level: &str) -> AppResult<ComponentLoggers> {
    ComponentLoggers::new(
        &paths.router_log,
        &paths.prompts_log,
        &paths.cli_log,
        paths.stream,
        level,
    )
}
