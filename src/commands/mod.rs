//! Command handlers
//!
//! One handler per CLI command. Handlers share an [`AppContext`] holding the
//! Router and the confirmation policy.

pub mod ai;
pub mod configure;
pub mod notes;
pub mod prompts;

use crate::config::Configuration;
use crate::core::data::Note;
use crate::logging::Logger;
use crate::router::Router;
use crate::utils::error::{AppError, AppResult};
use crate::utils::{confirm, print_info, print_success, print_warning};

pub struct AppContext {
    pub router: Router,
    pub assume_yes: bool,
}

impl AppContext {
    pub fn new(router: Router, assume_yes: bool) -> Self {
        Self { router, assume_yes }
    }

    pub fn logger(&self) -> &Logger {
        self.router.cli_logger()
    }

    pub fn confirm(&self, prompt: &str, default: bool) -> bool {
        confirm(prompt, default, self.assume_yes)
    }

    /// Error for a storage fault the Router already logged
    pub fn storage_fault(&self, action: &str) -> AppError {
        let paths = self.router.paths();
        AppError::Storage(format!(
            "Could not {} in {} (details in {})",
            action,
            paths.database_file.display(),
            paths.router_log.display()
        ))
    }

    /// Look up one note; `Ok(None)` when no note has `id`
    pub fn find_note(&self, id: i64) -> AppResult<Option<Note>> {
        self.router
            .find_note(id)
            .ok_or_else(|| self.storage_fault("read notes"))
    }

    /// Offer to create a missing or invalid config file, then open the
    /// prompt registry and offer to persist the defaults if it was absent.
    pub fn setup(&mut self) -> AppResult<()> {
        let config_path = self.router.config().config_path().to_path_buf();
        let usable = Configuration::read(&config_path)
            .map(|config| config.is_valid())
            .unwrap_or(false);

        if !usable {
            print_warning("No valid configuration was found.");
            let exists = config_path.exists();
            // --yes only ever creates a config, it never replaces one
            let create = if exists && self.assume_yes {
                print_warning(&format!(
                    "Leaving '{}' untouched; fix it or run `mnctl config init`.",
                    config_path.display()
                ));
                false
            } else {
                self.confirm(&format!("Create one at '{}'?", config_path.display()), !exists)
            };

            if create && self.router.create_config_file(&config_path) && self.router.reload(&config_path) {
                print_success(&format!("Configuration written to {}", config_path.display()));
            } else {
                print_info("Using the built-in default configuration.");
            }
        }

        let (existed, prompts_path) = match self.router.prompts() {
            Ok(registry) => (registry.existed(), registry.path().to_path_buf()),
            Err(e) => {
                self.logger()
                    .error(&format!("Cannot open prompt registry: {}", e));
                return Err(e);
            }
        };

        if !existed {
            print_warning("No prompt registry was found.");
            if self.confirm(&format!("Create one at '{}'?", prompts_path.display()), true) {
                self.router.prompts()?.persist()?;
                self.logger().debug(&format!(
                    "Default prompt registry written to {}",
                    prompts_path.display()
                ));
            } else {
                print_info("Using the built-in default prompts.");
            }
        }

        Ok(())
    }
}
