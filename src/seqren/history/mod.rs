//! # History Layer
//!
//! An append-only log of completed sessions (renames and undos). The
//! [`HistoryStore`] trait lets the rest of the crate work against any backend.
//!
//! ## Implementations
//!
//! - [`json::JsonHistoryStore`]: production, one JSON document on disk
//! - [`memory::InMemoryHistoryStore`]: tests; no persistence
//!
//! ## Storage Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "sessions": [ ...oldest first... ]
//! }
//! ```
//!
//! Each record carries the earliest known name of its file at the time the
//! session was logged, so lineage survives even if older sessions are later
//! pruned by hand. Lookups go through [`lineage::LineageIndex`].

use crate::error::{Result, SeqrenError};
use crate::model::{RenameRecord, RenameResult, Session};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod json;
pub mod lineage;
pub mod memory;

pub use lineage::LineageIndex;

pub const HISTORY_FILENAME: &str = "history.json";
pub const LOG_VERSION: u32 = 1;
/// Session selector that always means the newest session.
pub const LATEST: &str = "latest";

fn default_version() -> u32 {
    LOG_VERSION
}

/// The whole persisted log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self {
            version: LOG_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl HistoryLog {
    /// Appends `session`, stamping each record with its file's earliest name.
    pub fn push(&mut self, mut session: Session) -> Session {
        let lineage = self.lineage();
        for record in &mut session.records {
            record.original_name = lineage
                .original_name_of(&record.previous_path())
                .map(str::to_string)
                .unwrap_or_else(|| record.previous_name.clone());
        }
        self.sessions.push(session.clone());
        session
    }

    /// Looks a session up by id; [`LATEST`] picks the newest one.
    pub fn find(&self, id: &str) -> Option<&Session> {
        if id.eq_ignore_ascii_case(LATEST) {
            return self.sessions.last();
        }
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Sessions logged after the one with `id`, oldest first.
    pub fn after(&self, id: &str) -> &[Session] {
        match self.sessions.iter().position(|s| s.id == id) {
            Some(pos) => &self.sessions[pos + 1..],
            None => &[],
        }
    }

    /// Adds every session of `other` whose id is not present yet, keeping
    /// the log ordered by timestamp.
    pub fn merge(&mut self, other: HistoryLog) -> usize {
        let before = self.sessions.len();
        for session in other.sessions {
            if !self.sessions.iter().any(|s| s.id == session.id) {
                self.sessions.push(session);
            }
        }
        self.sessions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.sessions.len() - before
    }

    pub fn lineage(&self) -> LineageIndex {
        LineageIndex::from_sessions(&self.sessions)
    }
}

/// History records for the results that were applied.
///
/// `original_name` is left empty; [`HistoryLog::push`] fills it in.
pub fn applied_records(results: &[RenameResult]) -> Vec<RenameRecord> {
    results
        .iter()
        .filter(|r| r.is_applied())
        .filter_map(|r| {
            Some(RenameRecord {
                directory: r.source.parent()?.to_path_buf(),
                original_name: String::new(),
                previous_name: r.source.file_name()?.to_string_lossy().into_owned(),
                new_name: r.target.file_name()?.to_string_lossy().into_owned(),
            })
        })
        .collect()
}

/// Abstract interface for session history.
///
/// Writes take `&mut self`, so a single owner serializes them.
pub trait HistoryStore {
    /// The full log, oldest session first.
    fn load(&self) -> Result<HistoryLog>;

    /// Durably appends a session and returns it as stored.
    fn append(&mut self, session: Session) -> Result<Session>;

    /// Drops every session.
    fn clear(&mut self) -> Result<()>;

    /// Where the log lives, for backends that have a location.
    fn location(&self) -> Option<&Path>;

    /// Moves the log. With `migrate`, the current sessions are merged into
    /// the log at `path`; the old log is left as it is.
    ///
    /// Returns how many sessions the merge added to the new log.
    fn set_storage_location(&mut self, path: PathBuf, migrate: bool) -> Result<usize>;

    /// Newest first.
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut sessions = self.load()?.sessions;
        sessions.reverse();
        Ok(sessions)
    }

    fn session(&self, id: &str) -> Result<Session> {
        self.load()?
            .find(id)
            .cloned()
            .ok_or_else(|| SeqrenError::SessionNotFound(id.to_string()))
    }

    fn original_name_of(&self, path: &Path) -> Result<Option<String>> {
        Ok(self
            .load()?
            .lineage()
            .original_name_of(path)
            .map(str::to_string))
    }
}
