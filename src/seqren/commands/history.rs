use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::history::HistoryStore;

/// All sessions, newest first.
pub fn list<H: HistoryStore + ?Sized>(history: &H) -> Result<CmdResult> {
    let sessions = history.list_sessions()?;
    let mut result = CmdResult::default();
    if sessions.is_empty() {
        result.add_message(CmdMessage::info("No rename history yet."));
    }
    Ok(result.with_sessions(sessions))
}

pub fn show<H: HistoryStore + ?Sized>(history: &H, id: &str) -> Result<CmdResult> {
    let session = history.session(id)?;
    Ok(CmdResult::default().with_sessions(vec![session]))
}

pub fn clear<H: HistoryStore + ?Sized>(history: &mut H) -> Result<CmdResult> {
    let count = history.list_sessions()?.len();
    history.clear()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "History cleared ({} session(s) removed).",
        count
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::memory::fixtures::HistoryFixture;

    #[test]
    fn list_and_show() {
        let history = HistoryFixture::new()
            .with_renames("/p", &[("a.jpg", "X_1.jpg")])
            .with_renames("/p", &[("b.jpg", "Y_1.jpg")])
            .store;

        let listed = list(&history).unwrap();
        assert_eq!(listed.sessions.len(), 2);
        assert_eq!(listed.sessions[0].records[0].new_name, "Y_1.jpg");

        let shown = show(&history, &listed.sessions[1].id).unwrap();
        assert_eq!(shown.sessions[0].records[0].new_name, "X_1.jpg");
        assert!(show(&history, "unknown").is_err());
    }

    #[test]
    fn empty_list_says_so() {
        let history = HistoryFixture::new().store;
        let res = list(&history).unwrap();
        assert!(res.sessions.is_empty());
        assert_eq!(res.messages[0].content, "No rename history yet.");
    }

    #[test]
    fn clear_reports_count() {
        let mut history = HistoryFixture::new()
            .with_renames("/p", &[("a.jpg", "X_1.jpg")])
            .store;
        let res = clear(&mut history).unwrap();
        assert!(res.messages[0].content.contains("1 session(s)"));
        assert!(history.list_sessions().unwrap().is_empty());
    }
}
