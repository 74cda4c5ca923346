//! Storage layer for the prompt collection
//!
//! The whole collection lives as one JSON array under a single key of a
//! key-value store. [`FileStore`] keeps every key as a file in the data
//! directory, [`MemoryStore`] keeps them in a map for tests and dry runs.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::logging::log_storage_operation;
use crate::prompt::Prompt;

/// Key under which the prompt collection is stored
pub const STORAGE_KEY: &str = "prompts-storage";

/// Errors raised while reading or writing the key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize prompt collection: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to parse prompt collection: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// A persistent string-keyed store holding string values
pub trait KeyValueStore {
    /// Read the value under `key`, `None` when it was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the value under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value store backed by one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the value of `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source: io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write next to the target and rename so a crash never leaves half a file
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp.write_all(value.as_bytes()).map_err(io_err)?;
        temp.flush().map_err(io_err)?;
        temp.persist(self.path_for(key)).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one raw value, handy for corrupt-data tests
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage adapter reading and writing the prompt collection
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
}

impl Storage {
    /// Storage writing into `data_dir` through a [`FileStore`]
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_backend(FileStore::new(data_dir))
    }

    /// Storage that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    pub fn with_backend(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Read the persisted collection
    ///
    /// A missing key is an empty collection. Unreadable or unparsable data is
    /// an error, callers decide how to degrade.
    pub fn load_collection(&self) -> Result<Vec<Prompt>, StorageError> {
        let start = Instant::now();
        let result = self.backend.get(STORAGE_KEY).and_then(|raw| match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(StorageError::Deserialize),
            None => Ok(Vec::new()),
        });

        log_storage_operation(
            "load",
            result.as_ref().ok().map(Vec::len),
            result.is_ok(),
            Some(start.elapsed().as_millis() as u64),
        );
        result
    }

    /// Replace the persisted collection
    pub fn save_collection(&mut self, prompts: &[Prompt]) -> Result<(), StorageError> {
        let start = Instant::now();
        let result = serde_json::to_string(prompts)
            .map_err(StorageError::Serialize)
            .and_then(|raw| self.backend.set(STORAGE_KEY, &raw));

        log_storage_operation(
            "save",
            Some(prompts.len()),
            result.is_ok(),
            Some(start.elapsed().as_millis() as u64),
        );
        result
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Prompt> {
        vec![
            Prompt {
                id: "b".to_string(),
                title: "Second".to_string(),
                content: "<i>two</i>".to_string(),
            },
            Prompt {
                id: "a".to_string(),
                title: "First".to_string(),
                content: "one".to_string(),
            },
        ]
    }

    #[test]
    fn test_missing_key_is_empty() {
        let storage = Storage::in_memory();
        assert!(storage.load_collection().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_in_memory() {
        let mut storage = Storage::in_memory();
        storage.save_collection(&sample()).unwrap();
        assert_eq!(storage.load_collection().unwrap(), sample());
    }

    #[test]
    fn test_round_trip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested");

        let mut storage = Storage::open(&data_dir);
        storage.save_collection(&sample()).unwrap();

        let path = FileStore::new(&data_dir).path_for(STORAGE_KEY);
        assert!(path.ends_with("prompts-storage.json"));
        assert!(path.exists());

        let reopened = Storage::open(&data_dir);
        assert_eq!(reopened.load_collection().unwrap(), sample());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = Storage::open(temp_dir.path());
        storage.save_collection(&sample()).unwrap();
        storage.save_collection(&sample()[..1]).unwrap();

        let loaded = storage.load_collection().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "b");
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let storage = Storage::with_backend(MemoryStore::with_entry(STORAGE_KEY, "{not json"));
        assert!(matches!(
            storage.load_collection(),
            Err(StorageError::Deserialize(_))
        ));
    }

    #[test]
    fn test_stored_format_is_plain_array() {
        let mut backend = MemoryStore::new();
        let raw = serde_json::to_string(&sample()).unwrap();
        backend.set(STORAGE_KEY, &raw).unwrap();
        assert!(backend.get(STORAGE_KEY).unwrap().unwrap().starts_with("[{\"id\":\"b\""));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("prompts-storage"), "prompts-storage");
        assert_eq!(sanitize_key("../etc/passwd"), ".._etc_passwd");
    }
}
