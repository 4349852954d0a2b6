use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String-to-string local store, the shape of a browser `localStorage`.
#[async_trait(?Send)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store. `unavailable()` builds one that fails every call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;

    use super::{KeyValueStore, StorageError};

    /// Keeps every key in one JSON object file.
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        async fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
            match tokio::fs::read_to_string(&self.path).await {
                Ok(data) => Ok(serde_json::from_str(&data)?),
                Err(error) if error.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(source) => Err(self.io_error(source)),
            }
        }

        fn io_error(&self, source: std::io::Error) -> StorageError {
            StorageError::Io {
                path: self.path.display().to_string(),
                source,
            }
        }
    }

    #[async_trait(?Send)]
    impl KeyValueStore for JsonFileStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.read_all().await?.remove(key))
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut entries = self.read_all().await?;
            entries.insert(key.to_string(), value.to_string());

            let serialized = serde_json::to_string_pretty(&entries)?;
            tokio::fs::write(&self.path, serialized)
                .await
                .map_err(|source| self.io_error(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.get("coins").await.expect("get succeeds"), None);

        store.set("coins", "25").await.expect("set succeeds");
        assert_eq!(
            store.get("coins").await.expect("get succeeds").as_deref(),
            Some("25")
        );
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::unavailable();

        assert!(matches!(
            store.get("coins").await,
            Err(StorageError::Unavailable(_))
        ));
        assert!(matches!(
            store.set("coins", "1").await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn file_store_keeps_other_keys() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let store = JsonFileStore::new(root.path().join("store.json"));

        assert_eq!(store.get("coins").await.expect("missing file reads empty"), None);

        store.set("theme", "dark").await.expect("set succeeds");
        store.set("coins", "40").await.expect("set succeeds");

        assert_eq!(
            store.get("coins").await.expect("get succeeds").as_deref(),
            Some("40")
        );
        assert_eq!(
            store.get("theme").await.expect("get succeeds").as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let path = root.path().join("store.json");
        std::fs::write(&path, "not json").expect("file should be written");

        let store = JsonFileStore::new(&path);

        assert!(matches!(
            store.get("coins").await,
            Err(StorageError::Corrupt(_))
        ));
    }
}
