// store.rs — GoalStore: persistence seam for the goal book.
//
// The bot follows a load-mutate-save cycle per operation: the whole book is
// read before each mutation and written back in full afterwards. That is
// only safe while one event is processed at a time — the dispatch loop in
// tally-bot guarantees it by owning the store behind a single task.
//
// Two backends: JsonFileStore (production, one JSON document on disk) and
// InMemoryStore (test fake, also usable for dry runs).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::book::GoalBook;
use crate::error::StoreError;

/// Storage seam for the goal book.
///
/// `load` must never return partial data: a corrupt or invariant-violating
/// file is an error, not an empty book. `save` must be atomic from a
/// reader's perspective — no observer may see a half-written document.
pub trait GoalStore {
    /// Read the full persisted book. An absent file yields an empty book.
    fn load(&self) -> Result<GoalBook, StoreError>;

    /// Write the full book, replacing whatever was persisted before.
    fn save(&self, book: &GoalBook) -> Result<(), StoreError>;
}

/// Production store: the whole book as one pretty-printed JSON file.
///
/// Saves go through a `.tmp` sibling followed by a rename, so a crash
/// mid-write leaves the previous document intact and a concurrent reader
/// never sees a truncated file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path.
    /// Creates the parent directory if it doesn't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        Ok(Self { path })
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl GoalStore for JsonFileStore {
    fn load(&self) -> Result<GoalBook, StoreError> {
        if !self.path.exists() {
            return Ok(GoalBook::new());
        }
        let json = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        let book: GoalBook = serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        book.validate().map_err(|reason| StoreError::Invalid {
            path: self.path.display().to_string(),
            reason,
        })?;
        Ok(book)
    }

    fn save(&self, book: &GoalBook) -> Result<(), StoreError> {
        // Serialization of a validated book cannot fail; map anyway rather
        // than unwrap so an impossible failure still surfaces cleanly.
        let json = serde_json::to_string_pretty(book).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

/// In-memory store — the test fake, and the backend for dry-run demos.
#[derive(Default)]
pub struct InMemoryStore {
    book: Mutex<GoalBook>,
}

impl InMemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a book.
    pub fn with_book(book: GoalBook) -> Self {
        Self {
            book: Mutex::new(book),
        }
    }
}

impl GoalStore for InMemoryStore {
    fn load(&self) -> Result<GoalBook, StoreError> {
        let book = self
            .book
            .lock()
            .map_err(|e| StoreError::Lock(format!("in-memory store lock poisoned: {e}")))?;
        Ok(book.clone())
    }

    fn save(&self, book: &GoalBook) -> Result<(), StoreError> {
        let mut guard = self
            .book
            .lock()
            .map_err(|e| StoreError::Lock(format!("in-memory store lock poisoned: {e}")))?;
        *guard = book.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Goal, GoalKind};
    use tempfile::tempdir;

    fn sample_book() -> GoalBook {
        let mut book = GoalBook::new();
        book.ensure_chat("42");
        book.add_goal("42", Goal::new("Read books", 12, GoalKind::MoreThan));
        book.add_goal("42", Goal::new("Spend", 50, GoalKind::LessThan));
        book.add_goal("7", Goal::new("Run km", 300, GoalKind::MoreThan));
        book
    }

    #[test]
    fn load_without_file_returns_empty_book() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("goals.json")).unwrap();
        let book = store.load().unwrap();
        assert_eq!(book, GoalBook::new());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("goals.json")).unwrap();
        let book = sample_book();
        store.save(&book).unwrap();
        assert_eq!(store.load().unwrap(), book);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state/goals.json")).unwrap();
        store.save(&sample_book()).unwrap();
        assert!(dir.path().join("state/goals.json").exists());
    }

    #[test]
    fn save_leaves_no_tmp_sibling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.json");
        let store = JsonFileStore::new(&path).unwrap();
        store.save(&sample_book()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("goals.json.tmp").exists());
    }

    #[test]
    fn noop_save_is_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.json");
        let store = JsonFileStore::new(&path).unwrap();
        store.save(&sample_book()).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        // Load, remove a nonexistent goal (no-op), save again.
        let mut book = store.load().unwrap();
        assert!(!book.remove_goal("42", uuid::Uuid::new_v4()));
        store.save(&book).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn corrupt_file_is_an_error_not_an_empty_book() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn invariant_violating_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.json");
        // Hand-edited file with a zero threshold.
        fs::write(
            &path,
            r#"{"42": [{"id": "5e93cd74-0f32-4a14-b2b5-9b2b7892a583",
                       "name": "bad", "threshold": 0, "current": 0,
                       "type": "more_than"}]}"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Invalid { .. })));
    }

    #[test]
    fn wire_layout_matches_the_documented_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals.json");
        let store = JsonFileStore::new(&path).unwrap();
        store.save(&sample_book()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let chat = raw["42"].as_array().unwrap();
        assert_eq!(chat.len(), 2);
        for goal in chat {
            for key in ["id", "name", "threshold", "current", "type"] {
                assert!(goal.get(key).is_some(), "missing key {key}");
            }
        }
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemoryStore::new();
        assert_eq!(store.load().unwrap(), GoalBook::new());
        let book = sample_book();
        store.save(&book).unwrap();
        assert_eq!(store.load().unwrap(), book);
    }
}
