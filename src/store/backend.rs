use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Raw durable key-value namespace underneath the preference store
pub trait Storage: Send + Sync {
    /// Returns `None` when nothing is stored under `name`
    fn read(&self, name: &str) -> io::Result<Option<String>>;

    /// Stores `contents` under `name`. The value is durable once this returns.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;
}

/// One JSON file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) the data directory
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::debug!(path = %root.display(), "Opened preference directory");
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }
}

impl Storage for FileStorage {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        let target = self.path_for(name);
        let staging = self.root.join(format!(".{}.json.tmp", name));

        // Write-then-rename so a crash never leaves a half-written value
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&staging, &target)
    }
}

/// In-process storage. Clones share the same map, which lets tests open a
/// second store over the same data to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing serialization
    pub fn insert_raw(&self, name: &str, contents: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), contents.to_string());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned())
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        self.insert_raw(name, contents);
        Ok(())
    }
}
