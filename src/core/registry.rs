//! Prompt Registry
//!
//! Named prompt definitions persisted as a JSON document, plus execution of a
//! prompt against the text-completion backend.

use crate::core::data::{PromptDefinition, PromptMap, default_prompts};
use crate::core::traits::TextGenerator;
use crate::logging::Logger;
use crate::utils::atomic::write_atomic;
use crate::utils::error::{AppError, AppResult};
use crate::utils::template::Bindings;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub struct PromptRegistry {
    path: PathBuf,
    prompts: PromptMap,
    existed: bool,
    generator: Arc<dyn TextGenerator>,
    logger: Logger,
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("path", &self.path)
            .field("prompts", &self.prompts.keys().collect::<Vec<_>>())
            .field("existed", &self.existed)
            .finish()
    }
}

impl PromptRegistry {
    /// Load the registry at `path`. An absent file yields the default prompts;
    /// a malformed one is an error.
    pub fn open(
        path: &Path,
        generator: Arc<dyn TextGenerator>,
        logger: Logger,
    ) -> AppResult<Self> {
        let (prompts, existed) = match Self::load(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                logger.error(&e.to_string());
                return Err(e);
            }
        };

        if existed {
            logger.debug(&format!(
                "Loaded {} prompt(s) from {}",
                prompts.len(),
                path.display()
            ));
        } else {
            logger.info(&format!(
                "No prompt registry at {}, using {} default prompt(s)",
                path.display(),
                prompts.len()
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            prompts,
            existed,
            generator,
            logger,
        })
    }

    // ========== Persistence ==========

    /// Read the document at `path`, returning the prompts and whether the
    /// file existed
    pub fn load(path: &Path) -> AppResult<(PromptMap, bool)> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((default_prompts(), false));
            }
            Err(e) => {
                return Err(AppError::Io(format!(
                    "Failed to read prompt registry {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let corrupt = |reason: String| AppError::CorruptRegistry {
            path: path.to_path_buf(),
            reason,
        };

        let content = String::from_utf8(bytes).map_err(|e| corrupt(e.to_string()))?;
        let prompts: PromptMap = serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

        for (name, prompt) in &prompts {
            if name.trim().is_empty() {
                return Err(corrupt("entry with an empty name".to_string()));
            }
            prompt
                .validate()
                .map_err(|reason| corrupt(format!("prompt '{}': {}", name, reason)))?;
        }

        Ok((prompts, true))
    }

    /// Overwrite the document at `path` with `prompts`.
    ///
    /// Writes a sibling temp file and renames it over the target, so a failed
    /// write leaves the previous document intact.
    pub fn save(path: &Path, prompts: &PromptMap) -> AppResult<()> {
        let persistence = |what: &str, e: std::io::Error| {
            AppError::Persistence(format!("Failed to {} {}: {}", what, path.display(), e))
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| persistence("create directory for", e))?;
        }

        let content = serde_json::to_string_pretty(prompts)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize prompts: {}", e)))?;

        write_atomic(path, content).map_err(|e| persistence("write", e))
    }

    /// Write the in-memory prompts to this registry's file
    pub fn persist(&mut self) -> AppResult<()> {
        Self::save(&self.path, &self.prompts)?;
        self.existed = true;
        self.logger.info(&format!(
            "Saved {} prompt(s) to {}",
            self.prompts.len(),
            self.path.display()
        ));
        Ok(())
    }

    // ========== Queries ==========

    /// Whether the registry file existed when it was opened
    pub fn existed(&self) -> bool {
        self.existed
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prompt names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.prompts.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&PromptDefinition> {
        self.prompts.get(name)
    }

    // ========== Mutation ==========

    /// Insert or overwrite a prompt and persist the registry.
    ///
    /// Returns false on empty input or when persisting fails; in the latter
    /// case the in-memory entry is restored.
    pub fn add_or_replace(&mut self, name: &str, system: &str, template: &str, max_tokens: u32) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.logger.warn("Refusing to add a prompt with an empty name");
            return false;
        }

        let prompt = PromptDefinition::new(system, template, max_tokens);
        if let Err(reason) = prompt.validate() {
            self.logger
                .warn(&format!("Refusing to add prompt '{}': {}", name, reason));
            return false;
        }

        let previous = self.prompts.insert(name.to_string(), prompt);

        match self.persist() {
            Ok(()) => {
                let verb = if previous.is_some() { "Replaced" } else { "Added" };
                self.logger.info(&format!("{} prompt '{}'", verb, name));
                true
            }
            Err(e) => {
                match previous {
                    Some(previous) => self.prompts.insert(name.to_string(), previous),
                    None => self.prompts.remove(name),
                };
                self.logger
                    .error(&format!("Failed to save prompt '{}': {}", name, e));
                false
            }
        }
    }

    /// Remove a prompt and persist the registry. False if unknown or if
    /// persisting fails.
    pub fn delete(&mut self, name: &str) -> bool {
        let Some(removed) = self.prompts.remove(name) else {
            self.logger
                .warn(&format!("Cannot delete unknown prompt '{}'", name));
            return false;
        };

        match self.persist() {
            Ok(()) => {
                self.logger.info(&format!("Deleted prompt '{}'", name));
                true
            }
            Err(e) => {
                self.prompts.insert(name.to_string(), removed);
                self.logger
                    .error(&format!("Failed to delete prompt '{}': {}", name, e));
                false
            }
        }
    }

    // ========== Execution ==========

    /// Run the named prompt with `bindings` against the backend.
    ///
    /// `Ok(None)` for an unknown name or an empty/failed backend response.
    /// Missing bindings are [`AppError::Binding`] and the backend is not called.
    pub async fn execute(&self, name: &str, bindings: &Bindings) -> AppResult<Option<String>> {
        let Some(prompt) = self.prompts.get(name) else {
            self.logger.warn(&format!("Unknown prompt '{}'", name));
            return Ok(None);
        };

        let formatted = match prompt.render(bindings) {
            Ok(formatted) => formatted,
            Err(e) => {
                self.logger
                    .error(&format!("Cannot render prompt '{}': {}", name, e));
                return Err(e);
            }
        };

        let mut keys: Vec<&str> = bindings.keys().map(String::as_str).collect();
        keys.sort_unstable();
        self.logger.debug(&format!(
            "Executing prompt '{}' with bindings [{}], max_tokens={}, prompt_chars={}",
            name,
            keys.join(", "),
            prompt.max_tokens,
            formatted.chars().count()
        ));

        let started = Instant::now();
        let result = self
            .generator
            .generate(&formatted, &prompt.system, prompt.max_tokens)
            .await;
        let elapsed = started.elapsed();

        match result {
            Ok(text) if !text.trim().is_empty() => {
                self.logger.info(&format!(
                    "Prompt '{}' completed in {:.2?}, result_chars={}",
                    name,
                    elapsed,
                    text.chars().count()
                ));
                Ok(Some(text))
            }
            Ok(_) => {
                self.logger.error(&format!(
                    "Prompt '{}' returned an empty response after {:.2?}",
                    name, elapsed
                ));
                Ok(None)
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Prompt '{}' failed after {:.2?}: {}",
                    name, elapsed, e
                ));
                Ok(None)
            }
        }
    }
}
