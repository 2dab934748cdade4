//! # Undo Engine
//!
//! Reverts one logged session. Records are checked newest first: the file
//! must still be at its new name, and no later session may have moved it
//! away. Records that fail the check are reported as `StateChanged` and left
//! alone; the rest are turned into plan entries (`new -> previous`) and run
//! through the executor, so chains and occupied names are handled the same
//! way as in a forward rename.
//!
//! Whatever was actually reverted is logged as a new `undo` session pointing
//! at the reverted one. Undoing that session again redoes the rename.

use crate::error::{Result, SeqrenError};
use crate::execute::{self, ProgressEvent};
use crate::fs::FileSystem;
use crate::history::{applied_records, HistoryLog, HistoryStore};
use crate::model::{
    BatchSummary, FailureReason, FileEntry, PlanEntry, PlanStatus, RenameResult, Session,
    SessionKind,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct UndoReport {
    /// Id of the session that was reverted.
    pub reverted: String,
    pub results: Vec<RenameResult>,
    /// The undo session as logged; `None` when nothing was reverted.
    pub session: Option<Session>,
}

impl UndoReport {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.results)
    }
}

/// Verified half of an undo: entries to execute plus records that were
/// rejected up front. Both are in newest-record-first order.
#[derive(Debug, Default)]
pub struct UndoPlan {
    pub entries: Vec<PlanEntry>,
    pub rejected: Vec<(usize, RenameResult)>,
    /// Slot in the final result list for each of `entries`.
    slots: Vec<usize>,
}

pub fn prepare<F: FileSystem + ?Sized>(log: &HistoryLog, target: &Session, fs: &F) -> UndoPlan {
    let later = log.after(&target.id);
    let mut plan = UndoPlan::default();

    for (slot, record) in target.records.iter().rev().enumerate() {
        let current = record.new_path();
        let original = record.previous_path();

        let moved_later = later
            .iter()
            .flat_map(|s| s.records.iter())
            .any(|r| r.previous_path() == current);
        let problem = if moved_later {
            Some("renamed again by a later session".to_string())
        } else {
            match fs.stat(&current) {
                Ok(stat) => {
                    plan.entries.push(PlanEntry {
                        source: FileEntry::new(current.clone(), slot, stat),
                        target_name: record.previous_name.clone(),
                        status: PlanStatus::Ok,
                        reason: None,
                    });
                    plan.slots.push(slot);
                    None
                }
                Err(e) => Some(format!("no longer at {}: {}", current.display(), e)),
            }
        };

        if let Some(detail) = problem {
            plan.rejected.push((
                slot,
                RenameResult::failed(current, original, FailureReason::StateChanged, detail),
            ));
        }
    }
    plan
}

/// Reverts the session `session_id` (or `latest`) and logs the reversal.
pub fn undo<H, F>(
    history: &mut H,
    fs: Arc<F>,
    session_id: &str,
    on_event: impl FnMut(&ProgressEvent),
) -> Result<UndoReport>
where
    H: HistoryStore + ?Sized,
    F: FileSystem + ?Sized + 'static,
{
    let log = history.load()?;
    let target = log
        .find(session_id)
        .cloned()
        .ok_or_else(|| SeqrenError::SessionNotFound(session_id.to_string()))?;

    let UndoPlan {
        entries,
        rejected,
        slots,
    } = prepare(&log, &target, fs.as_ref());
    let total = entries.len() + rejected.len();

    let executed = execute::spawn(entries, fs)?.drain(on_event)?;

    let mut ordered: Vec<Option<RenameResult>> = vec![None; total];
    for (slot, result) in rejected {
        ordered[slot] = Some(result);
    }
    for (slot, result) in slots.into_iter().zip(executed) {
        ordered[slot] = Some(result);
    }
    let results: Vec<RenameResult> = ordered.into_iter().flatten().collect();

    let records = applied_records(&results);
    let session = if records.is_empty() {
        None
    } else {
        let session = Session::new(SessionKind::Undo, records).reverting(&target.id);
        Some(history.append(session)?)
    };

    let report = UndoReport {
        reverted: target.id,
        results,
        session,
    };
    let summary = report.summary();
    info!(
        session = %report.reverted,
        reverted = summary.applied,
        failed = summary.failed,
        "undo finished"
    );
    Ok(report)
}
