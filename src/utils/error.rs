use crate::utils::output::OutputStyle;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing template binding(s): {}", .0.join(", "))]
    Binding(Vec<String>),

    #[error("Config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Prompt registry {} is corrupt: {reason}", .path.display())]
    CorruptRegistry { path: PathBuf, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl AppError {
    /// Process exit code used by the binary
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) | AppError::Binding(_) => 2,
            AppError::ConfigNotFound(_) | AppError::Config(_) => 3,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

pub enum FlowResult {
    NotFound {
        item_type: String,
        search_term: String,
    },
    EmptyList {
        item_type: String,
    },
    Cancelled(String),
    Success(String),
}

pub fn report_error(err: &AppError) {
    match err {
        AppError::Binding(names) => {
            eprintln!(
                "❌ {}",
                OutputStyle::error(&format!("Prompt needs values for: {}", names.join(", ")))
            );
        }
        AppError::CorruptRegistry { path, reason } => {
            eprintln!(
                "❌ {}",
                OutputStyle::error(&format!(
                    "The prompt registry at '{}' is corrupt ({}). Fix or remove it and retry.",
                    path.display(),
                    reason
                ))
            );
        }
        AppError::Backend(msg) => {
            eprintln!("🌐 {}", OutputStyle::error(&format!("Backend: {}", msg)));
        }
        AppError::Validation(msg) => {
            eprintln!("⚠️  {}", OutputStyle::warning(msg));
        }
        other => {
            eprintln!("❌ {}", OutputStyle::error(&other.to_string()));
        }
    }
}

pub fn handle_flow(flow: FlowResult) {
    match flow {
        FlowResult::NotFound {
            item_type,
            search_term,
        } => {
            let msg = format!("{} '{}' not found", item_type, search_term);
            println!("⚠️  {}", OutputStyle::warning(&msg));
        }
        FlowResult::EmptyList { item_type } => {
            let msg = format!("No {} found", item_type);
            println!("{}", OutputStyle::muted(&msg));
        }
        FlowResult::Cancelled(msg) => {
            println!("⏹️  {}", OutputStyle::muted(&msg));
        }
        FlowResult::Success(msg) => {
            println!("✅ {}", OutputStyle::success(&msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_error_lists_missing_names() {
        let err = AppError::Binding(vec!["name".to_string(), "language".to_string()]);
        assert_eq!(err.to_string(), "Missing template binding(s): name, language");
    }

    #[test]
    fn test_corrupt_registry_names_the_file() {
        let corrupt = AppError::CorruptRegistry {
            path: PathBuf::from("/tmp/prompts.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(corrupt.exit_code(), 1);
        assert!(corrupt.to_string().contains("/tmp/prompts.json"));
        assert_eq!(AppError::Validation("empty".to_string()).exit_code(), 2);
    }
}
