use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreResult, check_quota, validate_key};

/// Directory-backed key-value store.
///
/// Each key is a file named after the key inside `root`. Writes go to a
/// hidden temp file first and are renamed into place, so a crash mid-write
/// leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota: None,
        }
    }

    /// Reject values larger than `quota` bytes.
    #[must_use]
    pub const fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        check_quota(value, self.quota)?;

        fs::create_dir_all(&self.root)?;
        let tmp_path = self.root.join(format!(".{key}.tmp"));
        let written = write_synced(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                tracing::debug!(error = %cleanup, "Failed to remove temp file");
            }
            return Err(e.into());
        }

        tracing::debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::StoreError;

    #[test]
    fn test_missing_key_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-created-yet"));
        assert!(store.get("cart").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).set("cart", "[1]").unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join(".cart.tmp").exists());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the value should go makes the rename fail
        fs::create_dir_all(dir.path().join("cart").join("blocker")).unwrap();

        let store = FileStore::new(dir.path());
        assert!(matches!(store.set("cart", "[]"), Err(StoreError::Io(_))));
        assert!(!dir.path().join(".cart.tmp").exists());
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("cart", "first").unwrap();
        store.set("cart", "second").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_quota_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).with_quota(Some(5));
        store.set("cart", "small").unwrap();
        assert!(matches!(
            store.set("cart", "too large"),
            Err(StoreError::QuotaExceeded { size: 9, limit: 5 })
        ));
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
