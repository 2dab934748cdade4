use crate::commands::{summary_message, CmdMessage, CmdResult};
use crate::error::Result;
use crate::execute::{self, ProgressEvent};
use crate::fs::FileSystem;
use crate::history::{applied_records, HistoryStore};
use crate::model::{Outcome, PlanEntry, Session, SessionKind};
use std::sync::Arc;
use tracing::error;

/// Applies an already previewed plan on a worker thread and logs the
/// renames that happened.
///
/// The files have moved by the time the log is written, so a history write
/// failure is reported as an error message next to the results instead of
/// replacing them; `logged` stays `None`.
pub fn run<H, F>(
    history: &mut H,
    fs: Arc<F>,
    plan: Vec<PlanEntry>,
    on_event: impl FnMut(&ProgressEvent),
) -> Result<CmdResult>
where
    H: HistoryStore + ?Sized,
    F: FileSystem + ?Sized + 'static,
{
    let results = execute::spawn(plan, fs)?.drain(on_event)?;

    let mut result = CmdResult::default();
    let records = applied_records(&results);
    let mut unlogged = None;
    let logged = if records.is_empty() {
        None
    } else {
        match history.append(Session::new(SessionKind::Rename, records)) {
            Ok(session) => Some(session),
            Err(e) => {
                error!(error = %e, "applied renames were not logged");
                unlogged = Some(e);
                None
            }
        }
    };

    for r in &results {
        if let Outcome::Failed { reason, detail } = &r.outcome {
            result.add_message(CmdMessage::error(format!(
                "{}: {} ({})",
                r.source.display(),
                reason,
                detail
            )));
        }
    }

    let mut result = result.with_results(results).with_logged(logged);
    if let Some(summary) = result.summary {
        result.add_message(summary_message("Renamed", &summary));
    }
    if let Some(session) = &result.logged {
        result.add_message(CmdMessage::info(format!(
            "Logged as session {}; `seqren undo` reverts it.",
            session.id
        )));
    }
    if let Some(e) = unlogged {
        result.add_message(CmdMessage::error(format!(
            "{}. These renames are not in the history and cannot be undone.",
            e
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::capture;
    use crate::fs::memory::MemoryFileSystem;
    use crate::commands::MessageLevel;
    use crate::history::json::JsonHistoryStore;
    use crate::history::memory::InMemoryHistoryStore;
    use crate::model::{FailureReason, RenameConfig};
    use crate::plan::build_plan;
    use std::path::{Path, PathBuf};

    fn plan_for(fs: &MemoryFileSystem, paths: &[&str], config: &RenameConfig) -> Vec<PlanEntry> {
        let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        let (files, _) = capture(fs, &paths);
        build_plan(&files, config, fs)
    }

    #[test]
    fn renames_and_logs_applied_subset() {
        let fs = Arc::new(MemoryFileSystem::new().with_files(["/d/a.jpg", "/d/b.jpg", "/d/c.jpg"]));
        fs.lock("/d/b.jpg");
        let plan = plan_for(&fs, &["/d/a.jpg", "/d/b.jpg", "/d/c.jpg"], &RenameConfig::new("X"));
        let mut history = InMemoryHistoryStore::new();

        let res = run(&mut history, fs.clone(), plan, |_| {}).unwrap();

        let summary = res.summary.unwrap();
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(res.results[1].failure(), Some(FailureReason::Locked));
        assert!(res.has_errors());

        let logged = res.logged.unwrap();
        assert_eq!(logged.records.len(), 2);
        assert_eq!(
            history
                .original_name_of(Path::new("/d/X_3.jpg"))
                .unwrap()
                .as_deref(),
            Some("c.jpg")
        );
    }

    #[test]
    fn history_write_failure_keeps_the_results() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let mut history = JsonHistoryStore::in_dir(blocker.join("sub"));

        let fs = Arc::new(MemoryFileSystem::new().with_files(["/d/a.jpg", "/d/b.jpg"]));
        let plan = plan_for(&fs, &["/d/a.jpg", "/d/b.jpg"], &RenameConfig::new("X"));

        let res = run(&mut history, fs.clone(), plan, |_| {}).unwrap();

        assert!(res.logged.is_none());
        assert_eq!(res.summary.unwrap().applied, 2);
        assert!(res.results.iter().all(|r| r.is_applied()));
        assert_eq!(fs.names_in("/d"), vec!["X_1.jpg", "X_2.jpg"]);
        assert!(res.has_errors());
        let last = res.messages.last().unwrap();
        assert_eq!(last.level, MessageLevel::Error);
        assert!(last.content.contains("cannot be undone"));
    }

    #[test]
    fn nothing_applied_logs_nothing() {
        let fs = Arc::new(MemoryFileSystem::new().with_file("/d/X_1.jpg"));
        let plan = plan_for(&fs, &["/d/X_1.jpg"], &RenameConfig::new("X"));
        let mut history = InMemoryHistoryStore::new();

        let res = run(&mut history, fs, plan, |_| {}).unwrap();

        assert!(res.logged.is_none());
        assert_eq!(res.summary.unwrap().skipped, 1);
        assert!(history.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn progress_reaches_the_caller() {
        let fs = Arc::new(MemoryFileSystem::new().with_files(["/d/a.jpg", "/d/b.jpg"]));
        let plan = plan_for(&fs, &["/d/a.jpg", "/d/b.jpg"], &RenameConfig::new("X"));
        let mut history = InMemoryHistoryStore::new();
        let mut processed = 0;

        run(&mut history, fs, plan, |e| {
            if matches!(e, ProgressEvent::Processed { .. }) {
                processed += 1;
            }
        })
        .unwrap();

        assert_eq!(processed, 2);
    }
}
