//! File-backed key-value store: one JSON document per key under a data directory.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::StoreError;
use crate::kv::KeyValueStore;

/// Persistent store rooted at a directory. Each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!(path = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write to a sibling temp file and rename, so readers never see a partial document.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let store = FileStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[test]
    fn set_get_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("participa-df-draft").unwrap(), None);
        store.set("participa-df-draft", r#"{"currentStep":2}"#).unwrap();
        assert_eq!(
            store.get("participa-df-draft").unwrap().as_deref(),
            Some(r#"{"currentStep":2}"#)
        );
        assert!(tmp.path().join("participa-df-draft.json").is_file());

        store.remove("participa-df-draft").unwrap();
        assert_eq!(store.get("participa-df-draft").unwrap(), None);
        // Absent key is fine.
        store.remove("participa-df-draft").unwrap();
    }

    #[test]
    fn values_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        FileStore::open(tmp.path()).unwrap().set("k", "[]").unwrap();
        let reopened = FileStore::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn overwrite_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden", "sp ace"] {
            assert!(
                matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))),
                "{key:?} accepted"
            );
        }
    }
}
