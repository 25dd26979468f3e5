use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// A single string-valued persistence slot
pub trait Slot: Send {
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&self, data: &str) -> Result<(), StorageError>;
}

/// Slot backed by `<dir>/<key>.json`
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, data: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Replace in one step so a crash never leaves half a snapshot
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same value.
#[derive(Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    value: Option<String>,
    writes: usize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let slot = Self::default();
        if let Ok(mut inner) = slot.inner.lock() {
            inner.value = Some(value.into());
        }
        slot
    }

    /// Current value
    pub fn value(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|inner| inner.value.clone())
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value())
    }

    fn write(&self, data: &str) -> Result<(), StorageError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| std::io::Error::other("memory slot poisoned"))?;
        inner.value = Some(data.to_string());
        inner.writes += 1;
        Ok(())
    }
}
