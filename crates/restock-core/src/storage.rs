//! Durable string-keyed slot storage.
//!
//! Provides the persistence boundary for the submission queue: a small set of
//! named slots, each holding a single string value, backed by the local
//! filesystem through `object_store`.
//!
//! # Atomic Writes
//!
//! Slot updates use the atomic write pattern:
//! 1. Write to temp file: `{key}.tmp`
//! 2. Rename to final path: `{key}`
//!
//! This ensures a slot is never observed partially written.

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use snafu::prelude::*;
use std::sync::Arc;

use crate::error::{InvalidKeySnafu, IoSnafu, ObjectStoreSnafu, StorageError};

/// A reference-counted slot store.
pub type SlotStoreRef = Arc<SlotStore>;

/// Durable key-value slot storage over the local filesystem.
///
/// The contract is deliberately small: `get(key) -> Option<String>` and
/// `set(key, value)`. Callers own serialization of whatever they keep in a
/// slot.
pub struct SlotStore {
    object_store: Arc<dyn ObjectStore>,
    root: String,
}

impl std::fmt::Debug for SlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlotStore<{}>", self.root)
    }
}

impl SlotStore {
    /// Open a slot store rooted at the given directory, creating it if needed.
    pub async fn open(root: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root).await.context(IoSnafu)?;

        let object_store: Arc<dyn ObjectStore> =
            Arc::new(LocalFileSystem::new_with_prefix(root).context(ObjectStoreSnafu)?);

        Ok(Self {
            object_store,
            root: root.display().to_string(),
        })
    }

    fn slot_path(&self, key: &str) -> Result<Path, StorageError> {
        Path::parse(key).context(InvalidKeySnafu { key })
    }

    /// Read the value of a slot.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;

        match self.object_store.get(&path).await {
            Ok(result) => {
                let bytes = result.bytes().await.context(ObjectStoreSnafu)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(source) => Err(StorageError::ObjectStore { source }),
        }
    }

    /// Overwrite a slot atomically using temp file + rename.
    ///
    /// If the write or rename fails, the previous value (if any) is unchanged.
    pub async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let temp_path = Path::from(format!("{path}.tmp"));

        let payload = PutPayload::from(Bytes::from(value.into_bytes()));
        self.object_store
            .put(&temp_path, payload)
            .await
            .context(ObjectStoreSnafu)?;
        self.object_store
            .rename(&temp_path, &path)
            .await
            .context(ObjectStoreSnafu)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_missing_slot_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = SlotStore::open(temp_dir.path()).await.unwrap();

        assert_eq!(store.get("nothing_here.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SlotStore::open(temp_dir.path()).await.unwrap();

        store
            .set("queue.json", "[1,2,3]".to_string())
            .await
            .unwrap();

        assert_eq!(
            store.get("queue.json").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = SlotStore::open(temp_dir.path()).await.unwrap();

        store.set("slot", "old".to_string()).await.unwrap();
        store.set("slot", "new".to_string()).await.unwrap();

        assert_eq!(store.get("slot").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = SlotStore::open(temp_dir.path()).await.unwrap();

        store.set("slot", "value".to_string()).await.unwrap();

        assert!(!temp_dir.path().join("slot.tmp").exists());
        assert!(temp_dir.path().join("slot").exists());
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = SlotStore::open(temp_dir.path()).await.unwrap();
            store.set("slot", "durable".to_string()).await.unwrap();
        }

        let reopened = SlotStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("slot").await.unwrap(),
            Some("durable".to_string())
        );
    }

    #[tokio::test]
    async fn test_idempotent_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = SlotStore::open(temp_dir.path()).await.unwrap();

        store.set("slot", "stable".to_string()).await.unwrap();

        let first = store.get("slot").await.unwrap();
        let second = store.get("slot").await.unwrap();
        assert_eq!(first, second);
    }
}
