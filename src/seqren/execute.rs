//! # Rename Executor
//!
//! Applies a plan entry by entry and reports one [`RenameResult`] per entry,
//! in plan order. A failing entry never stops the batch.
//!
//! ## Occupied targets
//!
//! A plan may give one selected file the current name of another selected file
//! that has not moved yet (`a.jpg -> X_1.jpg` while `X_1.jpg -> X_2.jpg` comes
//! later). The executor never overwrites: such a source is first parked under
//! a temporary name in its own directory and moved to its target after every
//! other entry has run. If the target is still occupied by then, the source is
//! put back and the entry fails.
//!
//! ## Threading
//!
//! [`execute`] runs on the calling thread and reports through a callback.
//! [`spawn`] runs the same loop on a worker thread and forwards progress over
//! an `mpsc` channel, so the caller keeps ownership of its own state and only
//! ever receives messages. Events for one batch arrive in processing order.
//!
//! Cancellation is checked between entries, never in the middle of a rename:
//! a cancelled batch leaves a renamed prefix and an untouched remainder.

use crate::error::{Result, SeqrenError};
use crate::fs::FileSystem;
use crate::model::{BatchSummary, FailureReason, Outcome, PlanEntry, RenameResult};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const CANCELLED_REASON: &str = "cancelled";

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started {
        total: usize,
    },
    Processed {
        /// 1-based count of entries finished so far.
        position: usize,
        total: usize,
        /// Index of the entry in the plan.
        index: usize,
        result: RenameResult,
    },
    Finished {
        summary: BatchSummary,
    },
}

/// Shared flag checked between entries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn classify_io_error(err: &io::Error) -> FailureReason {
    if is_lock_error(err) {
        FailureReason::Locked
    } else if err.kind() == io::ErrorKind::PermissionDenied {
        FailureReason::Permission
    } else {
        FailureReason::Other
    }
}

fn is_lock_error(err: &io::Error) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    const LOCK_CODES: &[i32] = &[32, 33];
    // EBUSY, ETXTBSY
    #[cfg(unix)]
    const LOCK_CODES: &[i32] = &[16, 26];
    #[cfg(not(any(windows, unix)))]
    const LOCK_CODES: &[i32] = &[];

    err.kind() == io::ErrorKind::ResourceBusy
        || err.raw_os_error().is_some_and(|code| LOCK_CODES.contains(&code))
}

struct Parked {
    index: usize,
    source: PathBuf,
    parked: PathBuf,
    target: PathBuf,
}

struct Reporter<'a, E: FnMut(ProgressEvent)> {
    total: usize,
    position: usize,
    results: Vec<Option<RenameResult>>,
    on_event: &'a mut E,
}

impl<E: FnMut(ProgressEvent)> Reporter<'_, E> {
    fn record(&mut self, index: usize, result: RenameResult) {
        match &result.outcome {
            Outcome::Failed { reason, detail } => warn!(
                source = %result.source.display(),
                %reason,
                "rename failed: {}",
                detail
            ),
            Outcome::Applied => debug!(
                "renamed {} -> {}",
                result.source.display(),
                result.target.display()
            ),
            Outcome::Skipped { .. } => {}
        }
        self.position += 1;
        (self.on_event)(ProgressEvent::Processed {
            position: self.position,
            total: self.total,
            index,
            result: result.clone(),
        });
        self.results[index] = Some(result);
    }
}

/// Applies `plan` on the current thread, reporting each finished entry.
pub fn execute<F, E>(
    plan: &[PlanEntry],
    fs: &F,
    cancel: &CancelToken,
    mut on_event: E,
) -> Vec<RenameResult>
where
    F: FileSystem + ?Sized,
    E: FnMut(ProgressEvent),
{
    let total = plan.len();
    on_event(ProgressEvent::Started { total });
    let mut reporter = Reporter {
        total,
        position: 0,
        results: vec![None; total],
        on_event: &mut on_event,
    };

    let mut parked: Vec<Parked> = Vec::new();
    for (index, entry) in plan.iter().enumerate() {
        let source = entry.source.path.clone();
        let target = entry.target_path();

        if cancel.is_cancelled() {
            reporter.record(index, RenameResult::skipped(source, target, CANCELLED_REASON));
            continue;
        }
        if !entry.is_executable() {
            let reason = entry
                .reason
                .clone()
                .unwrap_or_else(|| entry.status.label().to_string());
            reporter.record(index, RenameResult::skipped(source, target, reason));
            continue;
        }

        if fs.exists(&target) {
            let temp = parking_path(&source);
            match fs.rename(&source, &temp) {
                Ok(()) => parked.push(Parked {
                    index,
                    source,
                    parked: temp,
                    target,
                }),
                Err(e) => {
                    let reason = classify_io_error(&e);
                    reporter.record(
                        index,
                        RenameResult::failed(source, target, reason, e.to_string()),
                    );
                }
            }
            continue;
        }

        let result = match fs.rename(&source, &target) {
            Ok(()) => RenameResult::applied(source, target),
            Err(e) => {
                let reason = classify_io_error(&e);
                RenameResult::failed(source, target, reason, e.to_string())
            }
        };
        reporter.record(index, result);
    }

    for p in parked {
        let result = finish_parked(fs, cancel, &p);
        reporter.record(p.index, result);
    }

    let results: Vec<RenameResult> = reporter.results.into_iter().flatten().collect();
    let summary = BatchSummary::from_results(&results);
    info!(
        applied = summary.applied,
        skipped = summary.skipped,
        failed = summary.failed,
        "batch finished"
    );
    on_event(ProgressEvent::Finished { summary });
    results
}

fn finish_parked<F: FileSystem + ?Sized>(fs: &F, cancel: &CancelToken, p: &Parked) -> RenameResult {
    let source = p.source.clone();
    let target = p.target.clone();

    if cancel.is_cancelled() {
        return match fs.rename(&p.parked, &p.source) {
            Ok(()) => RenameResult::skipped(source, target, CANCELLED_REASON),
            Err(e) => stranded(p, e),
        };
    }
    if fs.exists(&p.target) {
        return match fs.rename(&p.parked, &p.source) {
            Ok(()) => RenameResult::failed(
                source,
                target,
                FailureReason::Other,
                "target is still occupied",
            ),
            Err(e) => stranded(p, e),
        };
    }
    match fs.rename(&p.parked, &p.target) {
        Ok(()) => RenameResult::applied(source, target),
        Err(e) => {
            let reason = classify_io_error(&e);
            let detail = e.to_string();
            match fs.rename(&p.parked, &p.source) {
                Ok(()) => RenameResult::failed(source, target, reason, detail),
                Err(e) => stranded(p, e),
            }
        }
    }
}

/// The file could not be moved back from its temporary name.
fn stranded(p: &Parked, err: io::Error) -> RenameResult {
    warn!(
        parked = %p.parked.display(),
        "could not restore parked file: {}",
        err
    );
    RenameResult::failed(
        p.source.clone(),
        p.target.clone(),
        classify_io_error(&err),
        format!("file left at {}: {}", p.parked.display(), err),
    )
}

fn parking_path(source: &Path) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!(".seqren-{}.tmp", Uuid::new_v4().simple()))
}

/// A batch running on a worker thread.
pub struct RenameJob {
    events: Receiver<ProgressEvent>,
    handle: JoinHandle<Vec<RenameResult>>,
    cancel: CancelToken,
}

impl RenameJob {
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Blocks until the worker is done and returns its results.
    pub fn wait(self) -> Result<Vec<RenameResult>> {
        self.handle
            .join()
            .map_err(|_| SeqrenError::Worker("rename worker panicked".to_string()))
    }

    /// Feeds every progress event to `on_event` on the calling thread, then
    /// returns the results.
    pub fn drain(self, mut on_event: impl FnMut(&ProgressEvent)) -> Result<Vec<RenameResult>> {
        for event in self.events.iter() {
            on_event(&event);
        }
        self.wait()
    }
}

/// Runs [`execute`] on a dedicated worker thread.
pub fn spawn<F>(plan: Vec<PlanEntry>, fs: Arc<F>) -> Result<RenameJob>
where
    F: FileSystem + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name("seqren-worker".to_string())
        .spawn(move || {
            execute(&plan, fs.as_ref(), &worker_cancel, |event| {
                // The receiver may have gone away; the batch still completes.
                let _ = tx.send(event);
            })
        })?;
    Ok(RenameJob {
        events: rx,
        handle,
        cancel,
    })
}
