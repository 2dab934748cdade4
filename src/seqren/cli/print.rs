use chrono::{DateTime, Utc};
use colored::Colorize;
use console::Term;
use seqren::api::{CmdMessage, MessageLevel};
use seqren::execute::ProgressEvent;
use seqren::model::{Outcome, PlanEntry, PlanStatus, RenameResult, Session, SessionKind};
use std::path::Path;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 36;
const STATUS_WIDTH: usize = 10;
const TIME_WIDTH: usize = 14;
const ARROW: &str = "→";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_plan(plan: &[PlanEntry]) {
    for entry in plan {
        println!("{}", render_plan_line(entry));
    }
}

fn render_plan_line(entry: &PlanEntry) -> String {
    let status = format!("{:<width$}", entry.status.label(), width = STATUS_WIDTH);
    let status = match entry.status {
        PlanStatus::Ok => status.green(),
        PlanStatus::ConflictResolved => status.yellow(),
        PlanStatus::ConflictUnresolved | PlanStatus::Invalid => status.red(),
    };
    let source = pad_to_width(&truncate_to_width(&entry.source.name, NAME_WIDTH), NAME_WIDTH);
    let mut line = format!("  {} {} {} {}", status, source, ARROW, entry.target_name);
    if let Some(reason) = &entry.reason {
        line.push_str(&format!("  {}", format!("({})", reason).dimmed()));
    }
    line
}

/// Lists the entries that did not go through; applied ones are summed up in
/// the messages.
pub(super) fn print_problems(results: &[RenameResult]) {
    for result in results {
        if let Some(line) = render_problem_line(result) {
            println!("{}", line);
        }
    }
}

fn render_problem_line(result: &RenameResult) -> Option<String> {
    let name = file_name(&result.source);
    match &result.outcome {
        Outcome::Applied => None,
        Outcome::Skipped { reason } => Some(format!(
            "  {} {}  {}",
            "skipped".dimmed(),
            name,
            format!("({})", reason).dimmed()
        )),
        // failures already came through as error messages
        Outcome::Failed { .. } => None,
    }
}

/// Lists what moved, for batches that did not make it into the history.
pub(super) fn print_applied(results: &[RenameResult]) {
    for result in results.iter().filter(|r| r.is_applied()) {
        println!("{}", render_applied_line(result));
    }
}

fn render_applied_line(result: &RenameResult) -> String {
    format!(
        "  {} {} {} {}",
        "renamed".green(),
        pad_to_width(&truncate_to_width(&file_name(&result.source), NAME_WIDTH), NAME_WIDTH),
        ARROW,
        file_name(&result.target)
    )
}

pub(super) fn print_sessions(sessions: &[Session]) {
    for session in sessions {
        println!("{}", render_session_line(session));
    }
}

fn render_session_line(session: &Session) -> String {
    let kind = match session.kind {
        SessionKind::Rename => "rename".normal(),
        SessionKind::Undo => "undo  ".yellow(),
    };
    let mut detail = format!("{} file(s)", session.records.len());
    if let Some(dir) = session.records.first().map(|r| r.directory.display().to_string()) {
        detail.push_str(&format!(" in {}", dir));
    }
    if let Some(reverted) = &session.reverts {
        detail.push_str(&format!(", reverts {}", reverted));
    }
    format!(
        "  {}  {}  {}  {}",
        session.id.bold(),
        kind,
        format_time_ago(session.timestamp).dimmed(),
        detail
    )
}

pub(super) fn print_session_detail(session: &Session) {
    println!("{}", render_session_line(session));
    println!();
    for record in &session.records {
        let mut line = format!(
            "    {} {} {}",
            pad_to_width(&truncate_to_width(&record.previous_name, NAME_WIDTH), NAME_WIDTH),
            ARROW,
            record.new_name
        );
        if record.original_name != record.previous_name {
            line.push_str(&format!("  {}", format!("(originally {})", record.original_name).dimmed()));
        }
        println!("{}", line);
    }
}

/// Single-line progress on stderr, only when it is a terminal.
pub(super) struct ProgressLine {
    term: Term,
}

impl ProgressLine {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub fn update(&self, event: &ProgressEvent) {
        if !self.term.is_term() {
            return;
        }
        let _ = match event {
            ProgressEvent::Started { .. } => Ok(()),
            ProgressEvent::Processed {
                position,
                total,
                result,
                ..
            } => self.term.clear_line().and_then(|_| {
                self.term.write_str(&format!(
                    "[{}/{}] {}",
                    position,
                    total,
                    truncate_to_width(&file_name(&result.source), NAME_WIDTH)
                ))
            }),
            ProgressEvent::Finished { .. } => self.term.clear_line(),
        };
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
