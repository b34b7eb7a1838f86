//! Key-value persistence backends.
//!
//! The store only ever needs "get the blob under this key" and "replace the
//! blob under this key". [`FileBackend`] keeps one JSON file per key in the
//! data directory; [`MemoryBackend`] keeps everything in a map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DateMapError, DateMapResult};

/// Key holding the serialized event store.
pub const EVENTS_KEY: &str = "events";

/// A blob store addressed by string keys.
pub trait Backend {
    fn get(&self, key: &str) -> DateMapResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> DateMapResult<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn get(&self, key: &str) -> DateMapResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> DateMapResult<()> {
        (**self).set(key, value)
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> DateMapResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DateMapResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// In-memory backend, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` already stored under `key`.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Make every following `set` fail, as a full disk would.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> DateMapResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DateMapResult<()> {
        if self.read_only {
            return Err(DateMapError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("backend is read-only, cannot write '{key}'"),
            )));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        assert_eq!(backend.get(EVENTS_KEY).unwrap(), None);
    }

    #[test]
    fn file_backend_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("nested"));

        backend.set(EVENTS_KEY, "{}").unwrap();

        assert_eq!(backend.get(EVENTS_KEY).unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("nested/events.json").exists());
        assert!(!dir.path().join("nested/events.json.tmp").exists());
    }

    #[test]
    fn file_backend_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());
        backend.set("k", "one").unwrap();
        backend.set("k", "two").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn read_only_memory_backend_refuses_writes() {
        let mut backend = MemoryBackend::new().with("k", "v");
        backend.set_read_only(true);
        assert!(backend.set("k", "w").is_err());
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn boxed_backend_delegates() {
        let mut backend: Box<dyn Backend + Send> = Box::new(MemoryBackend::new());
        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
    }
}
