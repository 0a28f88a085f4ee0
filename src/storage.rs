//! SQLite note store
//!
//! Opens the database on every call and creates the `notes` table when it is
//! missing, so the store holds no state between calls.

use crate::core::data::Note;
use crate::core::traits::NoteStore;
use crate::utils::error::{AppError, AppResult};
use rusqlite::{Connection, params};
use std::path::Path;

// AUTOINCREMENT keeps ids of deleted notes from being handed out again
const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteNoteStore;

impl SqliteNoteStore {
    pub fn new() -> Self {
        Self
    }

    fn open(database: &Path) -> AppResult<Connection> {
        let conn = Connection::open(database).map_err(|e| {
            AppError::Storage(format!(
                "Failed to open database {}: {}",
                database.display(),
                e
            ))
        })?;

        conn.execute(SCHEMA_SQL, [])
            .map_err(|e| AppError::Storage(format!("Failed to create notes table: {}", e)))?;

        Ok(conn)
    }
}

impl NoteStore for SqliteNoteStore {
    fn create(&self, database: &Path, content: &str) -> AppResult<i64> {
        let conn = Self::open(database)?;
        conn.execute("INSERT INTO notes (content) VALUES (?1)", params![content])?;
        Ok(conn.last_insert_rowid())
    }

    fn read_all(&self, database: &Path) -> AppResult<Vec<Note>> {
        let conn = Self::open(database)?;
        let mut stmt = conn.prepare("SELECT id, content, timestamp FROM notes ORDER BY id")?;

        let notes = stmt
            .query_map([], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    fn update(&self, database: &Path, id: i64, content: &str) -> AppResult<usize> {
        let conn = Self::open(database)?;
        let rows = conn.execute(
            "UPDATE notes SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        Ok(rows)
    }

    fn delete(&self, database: &Path, id: i64) -> AppResult<usize> {
        let conn = Self::open(database)?;
        let rows = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_crud_round() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.db");
        let store = SqliteNoteStore::new();

        let first = store.create(&db, "first note").unwrap();
        let second = store.create(&db, "second note").unwrap();
        assert!(second > first);

        let notes = store.read_all(&db).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content, "first note");
        assert!(notes[0].created_at().is_some());

        assert_eq!(store.update(&db, first, "edited").unwrap(), 1);
        assert_eq!(store.delete(&db, second).unwrap(), 1);

        let notes = store.read_all(&db).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "edited");
    }

    #[test]
    fn test_unknown_id_affects_zero_rows() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.db");
        let store = SqliteNoteStore::new();

        assert_eq!(store.update(&db, 42, "nothing").unwrap(), 0);
        assert_eq!(store.delete(&db, 42).unwrap(), 0);
        assert!(store.read_all(&db).unwrap().is_empty());
    }

    #[test]
    fn test_content_is_stored_verbatim() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.db");
        let store = SqliteNoteStore::new();

        let id = store.create(&db, "it's a 'quoted'; DROP TABLE notes; --").unwrap();
        let notes = store.read_all(&db).unwrap();
        assert_eq!(notes[0].id, id);
        assert_eq!(notes[0].content, "it's a 'quoted'; DROP TABLE notes; --");
    }

    #[test]
    fn test_ids_of_deleted_notes_are_not_reused() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("notes.db");
        let store = SqliteNoteStore::new();

        let first = store.create(&db, "kept").unwrap();
        let newest = store.create(&db, "dropped").unwrap();
        assert_eq!(store.delete(&db, newest).unwrap(), 1);

        let next = store.create(&db, "later").unwrap();
        assert!(next > newest);
        assert!(next > first);
        assert_eq!(store.update(&db, newest, "stale id").unwrap(), 0);
    }

    #[test]
    fn test_missing_directory_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("missing").join("notes.db");
        let result = SqliteNoteStore::new().read_all(&db);
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
