//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! seqren operation, whatever the UI.
//!
//! The facade dispatches to `commands/*.rs` and returns `Result<CmdResult>`.
//! It does no printing and no prompting: confirming a previewed plan before
//! [`SeqrenApi::apply`] is the client's job.
//!
//! ## Generic Over Backends
//!
//! `SeqrenApi<H: HistoryStore, F: FileSystem>`:
//! - Production: `SeqrenApi<JsonHistoryStore, OsFileSystem>`
//! - Testing: `SeqrenApi<InMemoryHistoryStore, MemoryFileSystem>`

use crate::commands;
use crate::error::Result;
use crate::execute::ProgressEvent;
use crate::fs::{resolve, FileSystem};
use crate::history::HistoryStore;
use crate::model::{PlanEntry, RenameConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, SeqrenPaths};

pub struct SeqrenApi<H: HistoryStore, F: FileSystem + 'static> {
    history: H,
    fs: Arc<F>,
    paths: SeqrenPaths,
}

impl<H: HistoryStore, F: FileSystem + 'static> SeqrenApi<H, F> {
    pub fn new(history: H, fs: F, paths: SeqrenPaths) -> Self {
        Self {
            history,
            fs: Arc::new(fs),
            paths,
        }
    }

    pub fn paths(&self) -> &SeqrenPaths {
        &self.paths
    }

    pub fn history_location(&self) -> Option<&Path> {
        self.history.location()
    }

    pub fn preview(&self, files: &[PathBuf], config: &RenameConfig) -> Result<CmdResult> {
        commands::preview::run(self.fs.as_ref(), files, config)
    }

    pub fn apply(
        &mut self,
        plan: Vec<PlanEntry>,
        on_event: impl FnMut(&ProgressEvent),
    ) -> Result<CmdResult> {
        commands::rename::run(&mut self.history, self.fs.clone(), plan, on_event)
    }

    pub fn undo(&mut self, session_id: &str, on_event: impl FnMut(&ProgressEvent)) -> Result<CmdResult> {
        commands::undo::run(&mut self.history, self.fs.clone(), session_id, on_event)
    }

    pub fn list_history(&self) -> Result<CmdResult> {
        commands::history::list(&self.history)
    }

    pub fn show_session(&self, session_id: &str) -> Result<CmdResult> {
        commands::history::show(&self.history, session_id)
    }

    pub fn clear_history(&mut self) -> Result<CmdResult> {
        commands::history::clear(&mut self.history)
    }

    pub fn origin(&self, path: &Path) -> Result<CmdResult> {
        commands::origin::run(&self.history, self.fs.as_ref(), path)
    }

    pub fn set_storage(&mut self, path: PathBuf, migrate: bool) -> Result<CmdResult> {
        let path = resolve(self.fs.as_ref(), &path);
        commands::storage::run(&mut self.history, &self.paths, path, migrate)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn remember_config(&self, config: &RenameConfig) -> Result<()> {
        commands::config::remember(&self.paths, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemoryFileSystem;
    use crate::history::memory::InMemoryHistoryStore;
    use crate::model::SessionKind;
    use tempfile::{tempdir, TempDir};

    fn api(files: &[&str]) -> (TempDir, SeqrenApi<InMemoryHistoryStore, MemoryFileSystem>) {
        let dir = tempdir().unwrap();
        let paths = SeqrenPaths {
            home: dir.path().to_path_buf(),
        };
        let fs = MemoryFileSystem::new().with_files(files.iter().copied());
        (dir, SeqrenApi::new(InMemoryHistoryStore::new(), fs, paths))
    }

    fn selection(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn preview_apply_undo_round_trip() {
        let (_dir, mut api) = api(&["/d/b.jpg", "/d/a.jpg"]);
        let config = RenameConfig::new("Trip");

        let preview = api.preview(&selection(&["/d/a.jpg", "/d/b.jpg"]), &config).unwrap();
        let applied = api.apply(preview.plan, |_| {}).unwrap();
        assert_eq!(applied.summary.unwrap().applied, 2);
        assert_eq!(api.fs.names_in("/d"), vec!["Trip_1.jpg", "Trip_2.jpg"]);

        let origin = api.origin(Path::new("/d/Trip_2.jpg")).unwrap();
        assert_eq!(origin.messages[0].content, "b.jpg");

        let undone = api.undo("latest", |_| {}).unwrap();
        assert_eq!(undone.summary.unwrap().applied, 2);
        assert_eq!(api.fs.names_in("/d"), vec!["a.jpg", "b.jpg"]);

        let history = api.list_history().unwrap();
        assert_eq!(history.sessions.len(), 2);
        assert_eq!(history.sessions[0].kind, SessionKind::Undo);
    }

    #[test]
    fn config_dispatches_to_settings() {
        let (_dir, api) = api(&[]);
        api.remember_config(&RenameConfig::new("Trip")).unwrap();
        let res = api.config(ConfigAction::ShowKey("base_name".into())).unwrap();
        assert_eq!(res.messages[0].content, "Trip");
    }

    #[test]
    fn clear_history_empties_log() {
        let (_dir, mut api) = api(&["/d/a.jpg"]);
        let preview = api
            .preview(&selection(&["/d/a.jpg"]), &RenameConfig::new("X"))
            .unwrap();
        api.apply(preview.plan, |_| {}).unwrap();

        api.clear_history().unwrap();
        assert!(api.list_history().unwrap().sessions.is_empty());
        assert!(api.show_session("latest").is_err());
    }
}
