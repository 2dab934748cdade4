use crate::commands::{summary_message, CmdMessage, CmdResult};
use crate::error::Result;
use crate::execute::ProgressEvent;
use crate::fs::FileSystem;
use crate::history::HistoryStore;
use crate::model::Outcome;
use crate::undo;
use std::sync::Arc;

pub fn run<H, F>(
    history: &mut H,
    fs: Arc<F>,
    session_id: &str,
    on_event: impl FnMut(&ProgressEvent),
) -> Result<CmdResult>
where
    H: HistoryStore + ?Sized,
    F: FileSystem + ?Sized + 'static,
{
    let report = undo::undo(history, fs, session_id, on_event)?;
    let summary = report.summary();

    let mut result = CmdResult::default();
    for r in &report.results {
        if let Outcome::Failed { reason, detail } = &r.outcome {
            result.add_message(CmdMessage::error(format!(
                "{}: {} ({})",
                r.source.display(),
                reason,
                detail
            )));
        }
    }
    result.add_message(summary_message(
        &format!("Session {}: restored", report.reverted),
        &summary,
    ));

    Ok(result
        .with_results(report.results)
        .with_logged(report.session))
}
