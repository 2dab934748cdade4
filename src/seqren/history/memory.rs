use super::{HistoryLog, HistoryStore};
use crate::error::Result;
use crate::model::Session;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory history for testing and development.
/// Does NOT persist data.
///
/// Keeps one log per location so that relocation and migration behave like
/// the JSON store.
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    logs: HashMap<PathBuf, HistoryLog>,
    current: PathBuf,
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self {
            logs: HashMap::new(),
            current: PathBuf::from("memory"),
        }
    }
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self) -> Result<HistoryLog> {
        Ok(self.logs.get(&self.current).cloned().unwrap_or_default())
    }

    fn append(&mut self, session: Session) -> Result<Session> {
        Ok(self
            .logs
            .entry(self.current.clone())
            .or_default()
            .push(session))
    }

    fn clear(&mut self) -> Result<()> {
        self.logs.remove(&self.current);
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.current)
    }

    fn set_storage_location(&mut self, path: PathBuf, migrate: bool) -> Result<usize> {
        let mut added = 0;
        if migrate && path != self.current {
            let current = self.load()?;
            added = self.logs.entry(path.clone()).or_default().merge(current);
        }
        self.current = path;
        Ok(added)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{RenameRecord, SessionKind};

    pub struct HistoryFixture {
        pub store: InMemoryHistoryStore,
    }

    impl Default for HistoryFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HistoryFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryHistoryStore::new(),
            }
        }

        /// Logs a rename session of `(previous, new)` names inside `dir`.
        pub fn with_renames(mut self, dir: impl AsRef<Path>, renames: &[(&str, &str)]) -> Self {
            let records = renames
                .iter()
                .map(|(from, to)| RenameRecord {
                    directory: dir.as_ref().to_path_buf(),
                    original_name: from.to_string(),
                    previous_name: from.to_string(),
                    new_name: to.to_string(),
                })
                .collect();
            self.store
                .append(Session::new(SessionKind::Rename, records))
                .unwrap();
            self
        }
    }
}
