//! mnctl - minimal notes from the command line
//!
//! Notes live in a SQLite database; named prompts run notes through a
//! text-completion backend. The [`router::Router`] is the single entry point
//! for every operation and is driven by the [`config::ConfigManager`].

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod logging;
pub mod router;
pub mod storage;
pub mod utils;

// Re-export core types and traits for easier use
pub use crate::config::{ConfigManager, Configuration, DefaultPaths, ResolvedPaths};
pub use crate::core::{
    data::{Note, PromptDefinition, PromptMap},
    registry::PromptRegistry,
    traits::{NoteStore, TextGenerator},
};
pub use crate::router::{Router, RouterSettings, RouterSummary};
pub use crate::utils::error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
