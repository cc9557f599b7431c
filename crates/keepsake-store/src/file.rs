use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::key::validate_key;
use crate::traits::SnapshotStore;

/// Prefix of in-flight temp files inside the root. Skipped by `keys()`.
const TEMP_PREFIX: &str = ".keepsake-";

/// File-per-key snapshot store.
///
/// Each key lives at `<root>/<sanitized-key>.<extension>` and the file holds
/// exactly the snapshot bytes. Writes land in a temp file inside the root and
/// are then renamed over the target, so a reader sees either the complete old
/// snapshot or the complete new one.
///
/// The root is not created implicitly on write; call
/// [`SnapshotStore::ensure_root`] first. Writing into a missing root fails.
#[derive(Clone, Debug)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store rooted at `root` with the default extension.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::at(root))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Storage location for a raw (unsanitized) key.
    ///
    /// Without an extension the keys `""`, `"."` and `".."` would name the
    /// root or its parent, so they are rejected in that configuration.
    pub fn location(&self, key: &str) -> StoreResult<PathBuf> {
        let sanitized = validate_key(key)?;
        if self.config.extension.is_empty() && matches!(sanitized.as_str(), "" | "." | "..") {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                reason: "names a directory when no extension is configured".into(),
            });
        }
        Ok(self.config.location_for(&sanitized))
    }

    fn key_from_file_name(&self, name: &str) -> Option<String> {
        if name.starts_with(TEMP_PREFIX) {
            return None;
        }
        if self.config.extension.is_empty() {
            return Some(name.to_string());
        }
        let stem = name.strip_suffix(self.config.extension.as_str())?;
        let stem = stem.strip_suffix('.')?;
        Some(stem.to_string())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl SnapshotStore for FileStore {
    fn ensure_root(&self) -> StoreResult<()> {
        if !self.root().is_dir() {
            fs::create_dir_all(self.root())?;
            debug!(root = %self.root().display(), "created storage root");
        }
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.location(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), len = bytes.len(), "read snapshot");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.location(key)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(self.root())?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), len = bytes.len(), "wrote snapshot");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.location(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.location(key)?.is_file())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(self.root()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(key) = entry
                .file_name()
                .to_str()
                .and_then(|name| self.key_from_file_name(name))
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().join("nested").join("root"));
        (dir, store)
    }

    #[test]
    fn ensure_root_creates_parents() {
        let (_dir, store) = temp_store();
        assert!(!store.root().exists());
        store.ensure_root().unwrap();
        assert!(store.root().is_dir());
        // Idempotent.
        store.ensure_root().unwrap();
    }

    #[test]
    fn missing_snapshot_is_none() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        assert_eq!(store.read("nothing").unwrap(), None);
        assert!(!store.exists("nothing").unwrap());
    }

    #[test]
    fn write_then_read() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("k", b"one").unwrap();
        assert_eq!(store.read("k").unwrap(), Some(b"one".to_vec()));
        store.write("k", b"two-longer").unwrap();
        assert_eq!(store.read("k").unwrap(), Some(b"two-longer".to_vec()));
    }

    #[test]
    fn file_holds_exactly_the_snapshot() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("user/settings", b"\x00\x01raw").unwrap();
        let path = store.root().join("user_settings.cache");
        assert_eq!(store.location("user/settings").unwrap(), path);
        assert_eq!(fs::read(&path).unwrap(), b"\x00\x01raw");
    }

    #[test]
    fn separator_keys_share_a_location() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("a/b", b"first").unwrap();
        store.write("a_b", b"second").unwrap();
        assert_eq!(store.read("a/b").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.keys().unwrap(), vec!["a_b".to_string()]);
    }

    #[test]
    fn traversal_keys_stay_in_root() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("../escape", b"x").unwrap();
        let path = store.location("../escape").unwrap();
        assert_eq!(path.parent().unwrap(), store.root());
        assert!(!store.root().parent().unwrap().join("escape.cache").exists());
    }

    #[test]
    fn write_without_root_fails() {
        let (_dir, store) = temp_store();
        let err = store.write("k", b"v").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn remove_reports_presence() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("k", b"v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn keys_ignore_foreign_files() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("b", b"2").unwrap();
        store.write("a", b"1").unwrap();
        fs::write(store.root().join("notes.txt"), b"ignored").unwrap();
        fs::write(store.root().join(".keepsake-abc"), b"partial").unwrap();
        fs::create_dir(store.root().join("sub.cache")).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn keys_of_missing_root_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn empty_key_is_a_hidden_file() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        store.write("", b"v").unwrap();
        assert_eq!(store.location("").unwrap(), store.root().join(".cache"));
        assert_eq!(store.read("").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.keys().unwrap(), vec![String::new()]);
    }

    #[test]
    fn dot_keys_need_an_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(StoreConfig::at(dir.path().join("root")).with_extension(""));
        store.ensure_root().unwrap();
        for key in ["", ".", ".."] {
            assert!(matches!(store.location(key), Err(StoreError::InvalidKey { .. })));
            assert!(store.write(key, b"v").is_err());
        }
        store.write("...", b"v").unwrap();
        assert_eq!(store.location("...").unwrap(), store.root().join("..."));

        let with_ext = FileStore::at(dir.path().join("root"));
        assert_eq!(with_ext.location("..").unwrap(), with_ext.root().join("...cache"));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (_dir, store) = temp_store();
        store.ensure_root().unwrap();
        for i in 0..5u8 {
            store.write("k", &[i]).unwrap();
        }
        let count = fs::read_dir(store.root()).unwrap().count();
        assert_eq!(count, 1);
    }
}
