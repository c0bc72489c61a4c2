//! Durable storage for the task list.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::task::{dedupe_ids, Task};

/// Errors reading or writing a task file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: invalid task data: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Load and save an ordered task list.
pub trait TaskStore: Send + Sync {
    fn load(&self) -> Result<Vec<Task>, StoreError>;
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
    /// Name used in diagnostics.
    fn name(&self) -> &str;
}

/// A task list kept as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    path: PathBuf,
}

impl FileTaskStore {
    pub const DEFAULT_NAME: &'static str = "File Store";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskStore for FileTaskStore {
    /// A missing file is an empty list.
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "task file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut tasks: Vec<Task> =
            serde_json::from_str(&data).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        let replaced = dedupe_ids(&mut tasks);
        if replaced > 0 {
            warn!(path = %self.path.display(), count = replaced, "replaced duplicate task ids");
        }
        Ok(tasks)
    }

    /// Atomic-ish write via temp + rename.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        }
        let data = serde_json::to_string_pretty(tasks).map_err(StoreError::Encode)?;
        let tmp = self.tmp_path();
        let mut f = File::create(&tmp).map_err(|e| self.io_err(e))?;
        f.write_all(data.as_bytes()).map_err(|e| self.io_err(e))?;
        f.flush().map_err(|e| self.io_err(e))?;
        drop(f);
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    fn name(&self) -> &str {
        Self::DEFAULT_NAME
    }
}
