//! Current path to earliest known name, folded from the session log.
//!
//! The index is never stored; it is rebuilt from the sessions whenever it is
//! needed. Applying a session is two-phase: every record's origin is read from
//! the index as it stood *before* the session, then all previous paths are
//! dropped, then all new paths are inserted. This keeps same-session chains
//! (`a -> X_1` alongside `X_1 -> X_2`) from borrowing each other's origin.

use crate::model::Session;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageIndex {
    origins: HashMap<PathBuf, String>,
}

impl LineageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `sessions` oldest first.
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut index = Self::new();
        for session in sessions {
            index.apply(session);
        }
        index
    }

    pub fn apply(&mut self, session: &Session) {
        let origins: Vec<String> = session
            .records
            .iter()
            .map(|r| {
                self.origins
                    .get(&r.previous_path())
                    .cloned()
                    .unwrap_or_else(|| r.original_name.clone())
            })
            .collect();

        for record in &session.records {
            self.origins.remove(&record.previous_path());
        }
        for (record, origin) in session.records.iter().zip(origins) {
            self.origins.insert(record.new_path(), origin);
        }
    }

    /// Earliest recorded name of the file now at `path`, if it was ever renamed.
    pub fn original_name_of(&self, path: &Path) -> Option<&str> {
        self.origins.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RenameRecord, SessionKind};

    fn record(from: &str, to: &str) -> RenameRecord {
        RenameRecord {
            directory: PathBuf::from("/p"),
            original_name: from.to_string(),
            previous_name: from.to_string(),
            new_name: to.to_string(),
        }
    }

    fn session(records: Vec<RenameRecord>) -> Session {
        Session::new(SessionKind::Rename, records)
    }

    #[test]
    fn follows_renames_across_sessions() {
        let sessions = vec![
            session(vec![record("Photo.jpg", "Temp_1.jpg")]),
            session(vec![record("Temp_1.jpg", "Final_1.jpg")]),
        ];
        let index = LineageIndex::from_sessions(&sessions);

        assert_eq!(
            index.original_name_of(Path::new("/p/Final_1.jpg")),
            Some("Photo.jpg")
        );
        assert_eq!(index.original_name_of(Path::new("/p/Temp_1.jpg")), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn same_session_chain_keeps_each_origin() {
        let sessions = vec![session(vec![
            record("a.jpg", "X_1.jpg"),
            record("X_1.jpg", "X_2.jpg"),
        ])];
        let index = LineageIndex::from_sessions(&sessions);

        assert_eq!(index.original_name_of(Path::new("/p/X_1.jpg")), Some("a.jpg"));
        assert_eq!(
            index.original_name_of(Path::new("/p/X_2.jpg")),
            Some("X_1.jpg")
        );
    }

    #[test]
    fn unknown_paths_have_no_origin() {
        let index = LineageIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.original_name_of(Path::new("/p/whatever.txt")), None);
    }

    #[test]
    fn records_carry_origin_when_earlier_sessions_are_gone() {
        let mut r = record("Temp_1.jpg", "Final_1.jpg");
        r.original_name = "Photo.jpg".to_string();
        let index = LineageIndex::from_sessions(&[session(vec![r])]);
        assert_eq!(
            index.original_name_of(Path::new("/p/Final_1.jpg")),
            Some("Photo.jpg")
        );
    }
}
