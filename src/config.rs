//! Config Manager
//!
//! Owns the configuration lifecycle: three-tier resolution at startup,
//! structural validation, default generation, reload, and derivation of every
//! storage and log location from the active document.

use crate::logging::DEFAULT_LOG_LEVEL;
use crate::utils::atomic::write_atomic;
use crate::utils::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Application directory name under the platform config/data directories
pub const APP_DIR: &str = "mnctl";

/// Model used when the config does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sections and keys that must be present for a document to be accepted
const REQUIRED_KEYS: &[(&str, &[&str])] = &[
    ("database", &["active"]),
    ("logger", &["router", "stream"]),
];

/// Built-in fallback locations, one per derived path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPaths {
    pub config_file: PathBuf,
    pub database_file: PathBuf,
    pub prompts_file: PathBuf,
    pub router_log: PathBuf,
    pub prompts_log: PathBuf,
    pub cli_log: PathBuf,
}

impl DefaultPaths {
    /// Defaults under the platform config and data directories
    pub fn standard() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            config_file: config_dir.join("config.toml"),
            ..Self::data_under(&data_dir)
        }
    }

    /// Every default, the config file included, rooted under `root`
    pub fn rooted(root: &Path) -> Self {
        Self {
            config_file: root.join("config.toml"),
            ..Self::data_under(root)
        }
    }

    fn data_under(root: &Path) -> Self {
        Self {
            config_file: root.join("config.toml"),
            database_file: root.join("db").join("notes.db"),
            prompts_file: root.join("prompts.json"),
            router_log: root.join("log").join("router.log"),
            prompts_log: root.join("log").join("prompts.log"),
            cli_log: root.join("log").join("cli.log"),
        }
    }
}

impl Default for DefaultPaths {
    fn default() -> Self {
        Self::standard()
    }
}

/// A configuration document, compared structurally
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration(Table);

impl Configuration {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a TOML document
    pub fn parse(content: &str) -> AppResult<Self> {
        toml::from_str::<Table>(content)
            .map(Self)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read and parse the file at `path`, distinguishing absence from malformation
    pub fn read(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::ConfigNotFound(path.to_path_buf())
            } else {
                AppError::Io(format!("Failed to read config {}: {}", path.display(), e))
            }
        })?;

        Self::parse(&content)
    }

    /// The built-in default document
    pub fn defaults(paths: &DefaultPaths) -> Self {
        let mut database = Table::new();
        database.insert("active".into(), path_value(&paths.database_file));
        database.insert("prompts".into(), path_value(&paths.prompts_file));

        let mut logger = Table::new();
        logger.insert("cli".into(), path_value(&paths.cli_log));
        logger.insert("router".into(), path_value(&paths.router_log));
        logger.insert("prompts".into(), path_value(&paths.prompts_log));
        logger.insert("stream".into(), Value::Boolean(false));

        let mut table = Table::new();
        table.insert("database".into(), Value::Table(database));
        table.insert("logger".into(), Value::Table(logger));
        Self(table)
    }

    pub fn to_toml_string(&self) -> AppResult<String> {
        toml::to_string_pretty(&self.0)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Structural check: required sections are tables holding the required keys
    pub fn is_valid(&self) -> bool {
        REQUIRED_KEYS.iter().all(|(section, keys)| {
            match self.0.get(*section).and_then(Value::as_table) {
                Some(table) => keys.iter().all(|key| table.contains_key(*key)),
                None => false,
            }
        })
    }

    fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.0.get(section)?.as_table()?.get(key)
    }

    fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)?.as_str().filter(|s| !s.trim().is_empty())
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        self.get(section, key)?.as_bool()
    }
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// Explicit mapping > parsed file > built-in default. An empty explicit
/// mapping counts as absent.
pub fn resolve_configuration(
    explicit: Option<Configuration>,
    file: Option<Configuration>,
    default: Configuration,
) -> Configuration {
    explicit
        .filter(|config| !config.is_empty())
        .or(file)
        .unwrap_or(default)
}

/// Every location and flag derived from the active configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub database_file: PathBuf,
    pub prompts_file: PathBuf,
    pub router_log: PathBuf,
    pub prompts_log: PathBuf,
    pub cli_log: PathBuf,
    pub stream: bool,
    pub log_level: String,
    pub model: String,
}

impl ResolvedPaths {
    /// Create the parent directory of every derived path
    pub fn ensure_directories(&self) -> AppResult<()> {
        for path in [
            &self.database_file,
            &self.prompts_file,
            &self.router_log,
            &self.prompts_log,
            &self.cli_log,
        ] {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Io(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }
}

/// Derive paths with an independent fallback per key
pub fn derive_paths(
    config: &Configuration,
    defaults: &DefaultPaths,
    stream_override: Option<bool>,
) -> ResolvedPaths {
    let path_or = |section: &str, key: &str, default: &Path| {
        config
            .get_str(section, key)
            .map(PathBuf::from)
            .unwrap_or_else(|| default.to_path_buf())
    };

    ResolvedPaths {
        database_file: path_or("database", "active", &defaults.database_file),
        prompts_file: path_or("database", "prompts", &defaults.prompts_file),
        router_log: path_or("logger", "router", &defaults.router_log),
        prompts_log: path_or("logger", "prompts", &defaults.prompts_log),
        cli_log: path_or("logger", "cli", &defaults.cli_log),
        stream: stream_override
            .or_else(|| config.get_bool("logger", "stream"))
            .unwrap_or(false),
        log_level: config
            .get_str("logger", "level")
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_string(),
        model: config
            .get_str("backend", "model")
            .unwrap_or(DEFAULT_MODEL)
            .to_string(),
    }
}

/// Result of a successful reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The file matched the active document; nothing was re-derived
    Unchanged,
    /// The active document was swapped and every path re-derived
    Reloaded,
}

/// A validated candidate with its derived paths, directories already created
#[derive(Debug, Clone)]
pub struct PendingReload {
    pub config: Configuration,
    pub paths: ResolvedPaths,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    defaults: DefaultPaths,
    stream_override: Option<bool>,
    active: Configuration,
    paths: ResolvedPaths,
}

impl ConfigManager {
    /// Resolve the initial configuration. A missing or malformed file falls
    /// back to the default silently.
    pub fn load(
        config_path: Option<PathBuf>,
        explicit: Option<Configuration>,
        defaults: DefaultPaths,
        stream_override: Option<bool>,
    ) -> Self {
        let config_path = config_path.unwrap_or_else(|| defaults.config_file.clone());
        let file = Configuration::read(&config_path).ok();
        let active = resolve_configuration(explicit, file, Configuration::defaults(&defaults));
        let paths = derive_paths(&active, &defaults, stream_override);

        Self {
            config_path,
            defaults,
            stream_override,
            active,
            paths,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn active(&self) -> &Configuration {
        &self.active
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn validate(candidate: &Configuration) -> bool {
        candidate.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.active.is_valid()
    }

    pub fn derive_paths(&self, config: &Configuration) -> ResolvedPaths {
        derive_paths(config, &self.defaults, self.stream_override)
    }

    pub fn ensure_directories(&self) -> AppResult<()> {
        self.paths.ensure_directories()
    }

    /// Parse, validate and derive a reload candidate without touching the
    /// active state. `Ok(None)` means the file matches the active document.
    pub fn prepare_reload(&self, path: &Path) -> AppResult<Option<PendingReload>> {
        let candidate = Configuration::read(path)?;

        if !candidate.is_valid() {
            return Err(AppError::Config(format!(
                "Invalid config {}: missing required sections or keys",
                path.display()
            )));
        }

        if candidate == self.active {
            return Ok(None);
        }

        let paths = self.derive_paths(&candidate);
        paths.ensure_directories()?;

        Ok(Some(PendingReload {
            config: candidate,
            paths,
        }))
    }

    /// Swap in a prepared reload
    pub fn commit(&mut self, pending: PendingReload) {
        self.active = pending.config;
        self.paths = pending.paths;
    }

    /// Re-read the file at `path` and make it active. On error nothing changes.
    pub fn reload(&mut self, path: &Path) -> AppResult<ReloadOutcome> {
        match self.prepare_reload(path)? {
            Some(pending) => {
                self.commit(pending);
                Ok(ReloadOutcome::Reloaded)
            }
            None => Ok(ReloadOutcome::Unchanged),
        }
    }

    /// Write the built-in default document to `path`. An existing file is
    /// replaced only once the new document is fully on disk.
    pub fn write_default(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Persistence(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = Configuration::defaults(&self.defaults).to_toml_string()?;

        write_atomic(path, content).map_err(|e| {
            AppError::Persistence(format!("Failed to write config {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn custom_config(root: &Path) -> String {
        format!(
            r#"[database]
active = "{db}"
prompts = "{prompts}"

[logger]
router = "{router}"
prompts = "{plog}"
cli = "{cli}"
stream = true
"#,
            db = root.join("custom/notes.db").display(),
            prompts = root.join("custom/prompts.json").display(),
            router = root.join("custom/log/router.log").display(),
            plog = root.join("custom/log/prompts.log").display(),
            cli = root.join("custom/log/cli.log").display(),
        )
    }

    #[test]
    fn test_default_load_with_no_files() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        let manager = ConfigManager::load(None, None, defaults.clone(), None);

        assert_eq!(manager.config_path(), defaults.config_file.as_path());
        assert_eq!(manager.active(), &Configuration::defaults(&defaults));
        assert!(manager.is_valid());
        assert_eq!(manager.paths().database_file, defaults.database_file);
        assert_eq!(manager.paths().prompts_file, defaults.prompts_file);
        assert!(!manager.paths().stream);
        // Nothing is created until first use
        assert!(!temp.path().join("db").exists());

        manager.ensure_directories().unwrap();
        assert!(temp.path().join("db").is_dir());
        assert!(temp.path().join("log").is_dir());
        manager.ensure_directories().unwrap();
    }

    #[test]
    fn test_resolution_precedence() {
        let explicit = Configuration::parse("[database]\nactive = \"explicit.db\"").unwrap();
        let file = Configuration::parse("[database]\nactive = \"file.db\"").unwrap();
        let default = Configuration::parse("[database]\nactive = \"default.db\"").unwrap();

        assert_eq!(
            resolve_configuration(Some(explicit.clone()), Some(file.clone()), default.clone()),
            explicit
        );
        assert_eq!(
            resolve_configuration(None, Some(file.clone()), default.clone()),
            file
        );
        assert_eq!(
            resolve_configuration(Some(Configuration::default()), Some(file.clone()), default.clone()),
            file
        );
        assert_eq!(resolve_configuration(None, None, default.clone()), default);
    }

    #[test]
    fn test_malformed_file_falls_back_silently_at_load() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        write(&defaults.config_file, "[database\nactive = ");

        let manager = ConfigManager::load(None, None, defaults.clone(), None);
        assert_eq!(manager.active(), &Configuration::defaults(&defaults));
    }

    #[test]
    fn test_explicit_mapping_wins_over_file() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        write(&defaults.config_file, &custom_config(temp.path()));

        let explicit = Configuration::parse("[database]\nactive = \"/tmp/explicit.db\"").unwrap();
        let manager = ConfigManager::load(None, Some(explicit), defaults.clone(), None);
        assert_eq!(manager.paths().database_file, PathBuf::from("/tmp/explicit.db"));
        // Keys the explicit mapping omits fall back individually
        assert_eq!(manager.paths().prompts_file, defaults.prompts_file);
    }

    #[test]
    fn test_validate_is_structural() {
        let defaults = DefaultPaths::rooted(Path::new("/tmp/x"));
        assert!(ConfigManager::validate(&Configuration::defaults(&defaults)));

        let missing_logger = Configuration::parse("[database]\nactive = \"a.db\"").unwrap();
        assert!(!ConfigManager::validate(&missing_logger));

        let missing_stream =
            Configuration::parse("[database]\nactive = \"a.db\"\n[logger]\nrouter = \"r.log\"").unwrap();
        assert!(!ConfigManager::validate(&missing_stream));

        let section_not_table = Configuration::parse(
            "database = \"a.db\"\n[logger]\nrouter = \"r.log\"\nstream = false",
        )
        .unwrap();
        assert!(!ConfigManager::validate(&section_not_table));

        // Presence only: a non-boolean stream still validates
        let odd_types = Configuration::parse(
            "[database]\nactive = 1\n[logger]\nrouter = \"r.log\"\nstream = \"yes\"",
        )
        .unwrap();
        assert!(ConfigManager::validate(&odd_types));
    }

    #[test]
    fn test_derive_paths_falls_back_per_key() {
        let defaults = DefaultPaths::rooted(Path::new("/data/mnctl"));
        let config = Configuration::parse(
            "[database]\nactive = \"/notes/main.db\"\n[logger]\nrouter = \"/logs/r.log\"\nstream = \"yes\"\nlevel = \"info\"\n[backend]\nmodel = \"gemini-pro\"",
        )
        .unwrap();

        let paths = derive_paths(&config, &defaults, None);
        assert_eq!(paths.database_file, PathBuf::from("/notes/main.db"));
        assert_eq!(paths.prompts_file, defaults.prompts_file);
        assert_eq!(paths.router_log, PathBuf::from("/logs/r.log"));
        assert_eq!(paths.cli_log, defaults.cli_log);
        assert!(!paths.stream);
        assert_eq!(paths.log_level, "info");
        assert_eq!(paths.model, "gemini-pro");

        let paths = derive_paths(&config, &defaults, Some(true));
        assert!(paths.stream);
    }

    #[test]
    fn test_reload_unchanged_file_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        let path = temp.path().join("config.toml");
        write(&path, &custom_config(temp.path()));

        let mut manager = ConfigManager::load(Some(path.clone()), None, defaults, None);
        assert_eq!(manager.reload(&path).unwrap(), ReloadOutcome::Unchanged);

        let before = manager.paths().clone();
        assert_eq!(manager.reload(&path).unwrap(), ReloadOutcome::Unchanged);
        assert_eq!(manager.paths(), &before);
    }

    #[test]
    fn test_reload_swaps_and_rederives() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        let mut manager = ConfigManager::load(None, None, defaults, None);

        let path = temp.path().join("other.toml");
        write(&path, &custom_config(temp.path()));

        assert_eq!(manager.reload(&path).unwrap(), ReloadOutcome::Reloaded);
        assert_eq!(
            manager.paths().database_file,
            temp.path().join("custom/notes.db")
        );
        assert!(manager.paths().stream);
        assert!(temp.path().join("custom/log").is_dir());
    }

    #[test]
    fn test_failed_reload_leaves_active_config() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        let mut manager = ConfigManager::load(None, None, defaults, None);
        let before = manager.active().clone();
        let paths_before = manager.paths().clone();

        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            manager.reload(&missing),
            Err(AppError::ConfigNotFound(_))
        ));

        let malformed = temp.path().join("malformed.toml");
        write(&malformed, "[logger\nstream = ");
        assert!(matches!(manager.reload(&malformed), Err(AppError::Config(_))));

        let invalid = temp.path().join("invalid.toml");
        write(&invalid, "[database]\nactive = \"x.db\"");
        assert!(matches!(manager.reload(&invalid), Err(AppError::Config(_))));

        assert_eq!(manager.active(), &before);
        assert_eq!(manager.paths(), &paths_before);
    }

    #[test]
    fn test_write_default_round_trips() {
        let temp = TempDir::new().unwrap();
        let defaults = DefaultPaths::rooted(temp.path());
        let manager = ConfigManager::load(None, None, defaults.clone(), None);

        let path = temp.path().join("nested").join("config.toml");
        manager.write_default(&path).unwrap();

        let written = Configuration::read(&path).unwrap();
        assert_eq!(written, Configuration::defaults(&defaults));
        assert!(written.is_valid());
    }

    #[test]
    fn test_write_default_reports_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let manager = ConfigManager::load(None, None, DefaultPaths::rooted(temp.path()), None);
        let result = manager.write_default(&blocker.join("config.toml"));
        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[test]
    fn test_failed_write_default_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[database]\nactive = \"mine.db\"\n").unwrap();
        // A directory squatting on the staging path makes the write fail
        std::fs::create_dir(crate::utils::atomic::temp_path(&path)).unwrap();

        let manager = ConfigManager::load(None, None, DefaultPaths::rooted(temp.path()), None);
        let result = manager.write_default(&path);
        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[database]\nactive = \"mine.db\"\n"
        );
    }
}
