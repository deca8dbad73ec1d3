use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    error::Result,
    index::{LoadedIndex, load_index},
    trie::TrieSnapshot,
};

/// Opaque key/value storage for serialized snapshots.
pub trait BlobStore: Send + Sync {
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write_blob(&self, key: &str, data: &[u8]) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn write_blob(&self, key: &str, data: &[u8]) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per blob under a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid blob key {key:?}"),
            )
            .into());
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FsBlobStore {
    fn read_blob(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_blob(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.blob_path(key)?;
        fs::create_dir_all(&self.dir)?;
        // Readers never see a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

pub fn save_snapshot(store: &dyn BlobStore, key: &str, snapshot: &TrieSnapshot) -> Result<()> {
    let data = snapshot.to_bytes()?;
    store.write_blob(key, &data)?;
    debug!(key, bytes = data.len(), "snapshot saved");
    Ok(())
}

/// Returns `Ok(None)` when nothing is stored under `key`.
pub fn load_snapshot(store: &dyn BlobStore, key: &str) -> Result<Option<LoadedIndex>> {
    let Some(data) = store.read_blob(key)? else {
        info!(key, "no stored snapshot");
        return Ok(None);
    };
    let snapshot = TrieSnapshot::from_bytes(&data)?;
    load_index(snapshot).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, index::build_index};
    use tempfile::tempdir;

    #[test]
    fn memory_store_round_trips_snapshot() {
        let store = MemoryBlobStore::new();
        save_snapshot(&store, "vocab", &build_index(["Apple", "Application"])).unwrap();

        let index = load_snapshot(&store, "vocab").unwrap().unwrap();
        assert_eq!(index.prefix_search("app", None), vec!["Apple", "Application"]);
    }

    #[test]
    fn missing_key_is_not_an_error() {
        let store = MemoryBlobStore::new();
        assert!(load_snapshot(&store, "absent").unwrap().is_none());
    }

    #[test]
    fn fs_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        assert_eq!(store.dir(), dir.path());
        save_snapshot(&store, "terms", &build_index(["Banana", "band"])).unwrap();
        assert!(store.dir().join("terms.json").exists());
        assert!(!store.dir().join("terms.json.tmp").exists());

        let reopened = FsBlobStore::new(dir.path());
        let index = load_snapshot(&reopened, "terms").unwrap().unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.prefix_search("ban", None), vec!["Banana", "band"]);
    }

    #[test]
    fn fs_store_reports_missing_file_as_none() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("not-created"));
        assert!(store.read_blob("terms").unwrap().is_none());
    }

    #[test]
    fn fs_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = store.write_blob(key, b"{}").unwrap_err();
            assert!(matches!(err, Error::Io(_)), "key {key:?} gave {err:?}");
        }
    }

    #[test]
    fn garbage_blob_is_corrupt() {
        let store = MemoryBlobStore::new();
        store.write_blob("vocab", b"not json").unwrap();
        assert!(matches!(
            load_snapshot(&store, "vocab"),
            Err(Error::CorruptIndex(_))
        ));
    }
}
