use crate::model::{BatchSummary, PlanEntry, RenameResult, Session};
use crate::settings::AppSettings;
use std::path::PathBuf;

pub mod config;
pub mod history;
pub mod origin;
pub mod preview;
pub mod rename;
pub mod storage;
pub mod undo;

/// Where seqren keeps its own files.
#[derive(Debug, Clone)]
pub struct SeqrenPaths {
    pub home: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub plan: Vec<PlanEntry>,
    pub results: Vec<RenameResult>,
    pub summary: Option<BatchSummary>,
    /// Sessions listed or shown.
    pub sessions: Vec<Session>,
    /// Session written to history by this command.
    pub logged: Option<Session>,
    pub settings: Option<AppSettings>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_plan(mut self, plan: Vec<PlanEntry>) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_results(mut self, results: Vec<RenameResult>) -> Self {
        self.summary = Some(BatchSummary::from_results(&results));
        self.results = results;
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<Session>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_logged(mut self, session: Option<Session>) -> Self {
        self.logged = session;
        self
    }

    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

/// One line summarizing a finished batch.
pub(crate) fn summary_message(verb: &str, summary: &BatchSummary) -> CmdMessage {
    let text = format!(
        "{} {} file(s), {} skipped, {} failed.",
        verb, summary.applied, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        CmdMessage::warning(text)
    } else if summary.applied > 0 {
        CmdMessage::success(text)
    } else {
        CmdMessage::info(text)
    }
}
