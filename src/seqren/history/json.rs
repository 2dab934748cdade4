use super::{HistoryLog, HistoryStore, HISTORY_FILENAME};
use crate::error::{Result, SeqrenError};
use crate::model::Session;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

enum Loaded {
    Missing,
    Valid(HistoryLog),
    Corrupt,
}

/// History persisted as a single JSON document.
///
/// A missing file is an empty history. A file that does not parse is also
/// treated as empty, and is moved aside to `<name>.corrupt` before the next
/// write so that its bytes are kept.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store using the default file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HISTORY_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Loaded> {
        if !path.exists() {
            return Ok(Loaded::Missing);
        }
        let content = fs::read_to_string(path).map_err(SeqrenError::Io)?;
        match serde_json::from_str::<HistoryLog>(&content) {
            Ok(log) => Ok(Loaded::Valid(log)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    "history file is corrupt, treating it as empty: {}",
                    e
                );
                Ok(Loaded::Corrupt)
            }
        }
    }

    fn read_log(path: &Path) -> Result<HistoryLog> {
        match Self::read(path)? {
            Loaded::Valid(log) => Ok(log),
            Loaded::Missing | Loaded::Corrupt => Ok(HistoryLog::default()),
        }
    }

    /// Loads the log for modification, moving a corrupt file out of the way.
    fn load_for_write(path: &Path) -> Result<HistoryLog> {
        match Self::read(path)? {
            Loaded::Valid(log) => Ok(log),
            Loaded::Missing => Ok(HistoryLog::default()),
            Loaded::Corrupt => {
                let aside = corrupt_path(path);
                fs::rename(path, &aside).map_err(|source| SeqrenError::HistoryUnwritable {
                    path: path.to_path_buf(),
                    source,
                })?;
                warn!(aside = %aside.display(), "corrupt history file preserved");
                Ok(HistoryLog::default())
            }
        }
    }

    /// Writes through a temporary file, retrying once.
    fn write_log(path: &Path, log: &HistoryLog) -> Result<()> {
        let content = serde_json::to_string_pretty(log)?;
        if let Err(first) = write_atomic(path, &content) {
            debug!("history write failed ({}), retrying", first);
            write_atomic(path, &content).map_err(|source| SeqrenError::HistoryUnwritable {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let tmp_file = dir.join(format!(".history-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_file, content)?;
    if let Err(e) = fs::rename(&tmp_file, path) {
        let _ = fs::remove_file(&tmp_file);
        return Err(e);
    }
    Ok(())
}

/// First free `<name>.corrupt`, `<name>.corrupt.1`, ... next to `path`.
fn corrupt_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| HISTORY_FILENAME.to_string());
    let first = path.with_file_name(format!("{}.corrupt", name));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| path.with_file_name(format!("{}.corrupt.{}", name, n)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<HistoryLog> {
        Self::read_log(&self.path)
    }

    fn append(&mut self, session: Session) -> Result<Session> {
        let mut log = Self::load_for_write(&self.path)?;
        let stored = log.push(session);
        Self::write_log(&self.path, &log)?;
        debug!(
            session = %stored.id,
            records = stored.records.len(),
            "session appended to history"
        );
        Ok(stored)
    }

    fn clear(&mut self) -> Result<()> {
        Self::load_for_write(&self.path)?;
        Self::write_log(&self.path, &HistoryLog::default())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn set_storage_location(&mut self, path: PathBuf, migrate: bool) -> Result<usize> {
        if path == self.path {
            return Ok(0);
        }
        let mut added = 0;
        if migrate {
            let current = Self::read_log(&self.path)?;
            let mut target = Self::load_for_write(&path)?;
            added = target.merge(current);
            Self::write_log(&path, &target)?;
            debug!(added, to = %path.display(), "history migrated");
        }
        self.path = path;
        Ok(added)
    }
}
