//! Persistence strategies behind [`TodoStore`](super::TodoStore).

use std::fs;
use std::io;
use std::path::PathBuf;

use super::StoreResult;
use crate::model::Todo;

/// Where the store's todos live between restarts.
///
/// `save` always receives the complete list; backends never see partial
/// updates.
pub trait Backend: Send + Sync {
    /// Short label used in startup logs.
    fn name(&self) -> &'static str;

    fn load(&self) -> StoreResult<Vec<Todo>>;

    fn save(&self, todos: &[Todo]) -> StoreResult<()>;
}

/// Keeps nothing. The store's own list is the only copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> StoreResult<Vec<Todo>> {
        Ok(Vec::new())
    }

    fn save(&self, _todos: &[Todo]) -> StoreResult<()> {
        Ok(())
    }
}

/// A JSON array of todos in a single file, pretty-printed.
///
/// Writes go to `<path>.tmp` first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Backend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    /// A missing file is created holding `[]`; a blank one reads as empty.
    fn load(&self) -> StoreResult<Vec<Todo>> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "creating empty data file");
                self.save(&[])?;
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, todos: &[Todo]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(todos)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
