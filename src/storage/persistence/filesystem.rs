//! Filesystem-based key-value store.
//!
//! Stores each key as `<base>/<key>.json`. Writes go to a sibling temporary
//! file that is then renamed over the target, so a concurrent reader sees
//! either the previous text or the new text.
//!
//! # Security
//!
//! - **Path traversal**: keys are validated before being turned into paths
//! - **File size limits**: oversized files are refused on read

use crate::storage::traits::KeyValueStore;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum file size for stored values (16MB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Filesystem-backed store.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    /// Base directory for storage.
    base_path: PathBuf,
}

impl FilesystemStore {
    /// Creates a new filesystem store.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Creates a new filesystem store, creating the directory up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_create(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| Error::operation("create_storage_dir", e))?;
        Ok(Self { base_path })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path for a key.
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if !Self::is_safe_key(key) {
            return Err(Error::InvalidInput(format!(
                "Storage key contains invalid characters: {key}"
            )));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }

    /// Checks if a key is safe to use as a file name.
    fn is_safe_key(key: &str) -> bool {
        !key.is_empty()
            && key.len() <= 200
            && !key.starts_with('.')
            && !key.contains("..")
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl KeyValueStore for FilesystemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(&path).map_err(|e| Error::operation("read_file_metadata", e))?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(Error::operation(
                "read_store_file",
                format!(
                    "{} exceeds maximum size of {MAX_FILE_SIZE} bytes",
                    path.display()
                ),
            ));
        }

        let text = fs::read_to_string(&path).map_err(|e| Error::operation("read_store_file", e))?;
        Ok(Some(text))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.base_path).map_err(|e| Error::operation("create_storage_dir", e))?;

        let tmp_path = self.base_path.join(format!(".{key}.json.tmp"));
        fs::write(&tmp_path, value).map_err(|e| Error::operation("write_store_file", e))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            Error::operation("replace_store_file", e)
        })?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote store file");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::operation("delete_store_file", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = FilesystemStore::new(dir.path().join("nested"));

        assert!(store.get("magic_keywords_data").unwrap().is_none());
        store.set("magic_keywords_data", "[]").unwrap();
        assert_eq!(
            store.get("magic_keywords_data").unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.path().join("nested/magic_keywords_data.json").exists());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut store = FilesystemStore::with_create(dir.path()).unwrap();

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut store = FilesystemStore::new(dir.path());
        store.remove("absent").unwrap();
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FilesystemStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.get(".hidden").is_err());
        assert!(store.get("").is_err());
    }
}
