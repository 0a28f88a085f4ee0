//! Core trait definitions
//!
//! The note store and the text-completion backend sit behind these traits so
//! the Router and the Prompt Registry never depend on a concrete engine.

use crate::core::data::Note;
use crate::utils::error::AppResult;
use async_trait::async_trait;
use std::path::Path;

/// Storage operations for note records
///
/// Every call names the database it targets, so a config reload that moves
/// the active database takes effect on the next call.
pub trait NoteStore {
    /// Insert a note and return the id the store assigned
    fn create(&self, database: &Path, content: &str) -> AppResult<i64>;

    /// Read every note in id order
    fn read_all(&self, database: &Path) -> AppResult<Vec<Note>>;

    /// Replace a note's content, returning the number of rows affected
    fn update(&self, database: &Path, id: i64, content: &str) -> AppResult<usize>;

    /// Remove a note, returning the number of rows affected
    fn delete(&self, database: &Path, id: i64) -> AppResult<usize>;
}

/// Text-completion backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` under `system_instruction`.
    ///
    /// May return empty text; transport and API failures are
    /// [`AppError::Backend`](crate::utils::error::AppError::Backend).
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        max_output_tokens: u32,
    ) -> AppResult<String>;
}
