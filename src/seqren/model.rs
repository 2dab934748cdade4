use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_SEPARATOR: &str = "_";
pub const DEFAULT_START_NUMBER: u32 = 1;

/// A file selected for renaming, captured once per planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    /// Includes the leading dot; empty when the file has none.
    pub extension: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub selection_index: usize,
}

impl FileEntry {
    pub fn new(path: PathBuf, selection_index: usize, stat: FileStat) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self {
            path,
            name,
            extension,
            size: stat.size,
            modified: stat.modified,
            created: stat.created.unwrap_or(stat.modified),
            selection_index,
        }
    }

    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Raw metadata as reported by a [`crate::fs::FileSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaddingMode {
    #[default]
    Auto,
    /// Fixed digit count; `Fixed(0)` disables padding.
    Fixed(u8),
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaddingMode::Auto => write!(f, "auto"),
            PaddingMode::Fixed(0) => write!(f, "none"),
            PaddingMode::Fixed(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for PaddingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PaddingMode::Auto),
            "none" | "0" => Ok(PaddingMode::Fixed(0)),
            other => other
                .parse::<u8>()
                .ok()
                .filter(|n| *n <= 9)
                .map(PaddingMode::Fixed)
                .ok_or_else(|| format!("Invalid padding '{}': use auto, none or 1-9", s)),
        }
    }
}

impl TryFrom<String> for PaddingMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaddingMode> for String {
    fn from(value: PaddingMode) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Alphabetical,
    ModifiedAsc,
    ModifiedDesc,
    CreatedAsc,
    CreatedDesc,
    Selection,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Alphabetical => "alphabetical",
            SortKey::ModifiedAsc => "modified-asc",
            SortKey::ModifiedDesc => "modified-desc",
            SortKey::CreatedAsc => "created-asc",
            SortKey::CreatedDesc => "created-desc",
            SortKey::Selection => "selection",
        };
        f.write_str(s)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphabetical" | "name" => Ok(SortKey::Alphabetical),
            "modified" | "modified-asc" => Ok(SortKey::ModifiedAsc),
            "modified-desc" => Ok(SortKey::ModifiedDesc),
            "created" | "created-asc" => Ok(SortKey::CreatedAsc),
            "created-desc" => Ok(SortKey::CreatedDesc),
            "selection" => Ok(SortKey::Selection),
            _ => Err(format!(
                "Unknown sort key '{}': use alphabetical, modified-asc, modified-desc, \
                 created-asc, created-desc or selection",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    Skip,
    Suffix,
    #[default]
    AutoIncrement,
    /// Per-conflict prompting has no decision interface yet; behaves as `Skip`.
    Prompt,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictStrategy::Skip => "skip",
            ConflictStrategy::Suffix => "suffix",
            ConflictStrategy::AutoIncrement => "auto-increment",
            ConflictStrategy::Prompt => "prompt",
        };
        f.write_str(s)
    }
}

impl FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictStrategy::Skip),
            "suffix" | "add-suffix" => Ok(ConflictStrategy::Suffix),
            "auto-increment" | "increment" => Ok(ConflictStrategy::AutoIncrement),
            "prompt" => Ok(ConflictStrategy::Prompt),
            _ => Err(format!(
                "Unknown conflict strategy '{}': use skip, suffix, auto-increment or prompt",
                s
            )),
        }
    }
}

/// User-chosen naming rules for one rename operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    pub base_name: String,
    pub separator: String,
    pub start_number: u32,
    pub padding: PaddingMode,
    pub sort: SortKey,
    pub conflict: ConflictStrategy,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            base_name: String::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            start_number: DEFAULT_START_NUMBER,
            padding: PaddingMode::Auto,
            sort: SortKey::Alphabetical,
            conflict: ConflictStrategy::AutoIncrement,
        }
    }
}

impl RenameConfig {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            ..Self::default()
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_start_number(mut self, start: u32) -> Self {
        self.start_number = start;
        self
    }

    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_conflict(mut self, conflict: ConflictStrategy) -> Self {
        self.conflict = conflict;
        self
    }

    /// Digit width used for the sequence number of a batch of `count` files.
    pub fn padding_width(&self, count: usize) -> usize {
        match self.padding {
            PaddingMode::Fixed(n) => n as usize,
            PaddingMode::Auto => {
                if count <= 9 {
                    return 0;
                }
                let last = self.start_number as u64 + count as u64 - 1;
                digit_count(count as u64).max(digit_count(last))
            }
        }
    }
}

fn digit_count(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    Ok,
    ConflictResolved,
    ConflictUnresolved,
    Invalid,
}

impl PlanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PlanStatus::Ok => "ok",
            PlanStatus::ConflictResolved => "resolved",
            PlanStatus::ConflictUnresolved => "conflict",
            PlanStatus::Invalid => "invalid",
        }
    }
}

/// One proposed rename in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub source: FileEntry,
    pub target_name: String,
    pub status: PlanStatus,
    pub reason: Option<String>,
}

impl PlanEntry {
    pub fn target_path(&self) -> PathBuf {
        self.source.directory().join(&self.target_name)
    }

    pub fn is_unchanged(&self) -> bool {
        self.target_name == self.source.name
    }

    /// Whether the executor should attempt an OS rename for this entry.
    pub fn is_executable(&self) -> bool {
        matches!(self.status, PlanStatus::Ok | PlanStatus::ConflictResolved) && !self.is_unchanged()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    Locked,
    Permission,
    StateChanged,
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::Locked => "locked",
            FailureReason::Permission => "permission denied",
            FailureReason::StateChanged => "state changed",
            FailureReason::Other => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped { reason: String },
    Failed { reason: FailureReason, detail: String },
}

/// Outcome of one plan entry after execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameResult {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: Outcome,
}

impl RenameResult {
    pub fn applied(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            outcome: Outcome::Applied,
        }
    }

    pub fn skipped(source: PathBuf, target: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            source,
            target,
            outcome: Outcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(
        source: PathBuf,
        target: PathBuf,
        reason: FailureReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            outcome: Outcome::Failed {
                reason,
                detail: detail.into(),
            },
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, Outcome::Applied)
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match &self.outcome {
            Outcome::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Applied/skipped/failed accounting over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[RenameResult]) -> Self {
        results
            .iter()
            .fold(BatchSummary::default(), |mut acc, r| {
                match r.outcome {
                    Outcome::Applied => acc.applied += 1,
                    Outcome::Skipped { .. } => acc.skipped += 1,
                    Outcome::Failed { .. } => acc.failed += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Rename,
    Undo,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Rename => f.write_str("rename"),
            SessionKind::Undo => f.write_str("undo"),
        }
    }
}

/// One file touched by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    pub directory: PathBuf,
    /// Earliest known name of this file when the session ran.
    pub original_name: String,
    pub previous_name: String,
    pub new_name: String,
}

impl RenameRecord {
    pub fn previous_path(&self) -> PathBuf {
        self.directory.join(&self.previous_name)
    }

    pub fn new_path(&self) -> PathBuf {
        self.directory.join(&self.new_name)
    }
}

/// A completed rename or undo, as persisted in the history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: SessionKind,
    /// For undo sessions, the id of the session that was reverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverts: Option<String>,
    pub records: Vec<RenameRecord>,
}

impl Session {
    pub fn new(kind: SessionKind, records: Vec<RenameRecord>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: session_id(timestamp),
            timestamp,
            kind,
            reverts: None,
            records,
        }
    }

    pub fn reverting(mut self, session_id: impl Into<String>) -> Self {
        self.reverts = Some(session_id.into());
        self
    }
}

/// Timestamp-derived id with a short random suffix so that two sessions
/// recorded within the same millisecond stay distinct.
fn session_id(timestamp: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", timestamp.format("%Y%m%dT%H%M%S%3f"), &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat() -> FileStat {
        FileStat {
            size: 10,
            modified: Utc::now(),
            created: None,
        }
    }

    #[test]
    fn file_entry_splits_name_and_extension() {
        let entry = FileEntry::new(PathBuf::from("/photos/Photo.JPG"), 0, stat());
        assert_eq!(entry.name, "Photo.JPG");
        assert_eq!(entry.extension, ".JPG");
        assert_eq!(entry.directory(), Path::new("/photos"));
        assert_eq!(entry.created, entry.modified);
    }

    #[test]
    fn file_entry_without_extension() {
        let entry = FileEntry::new(PathBuf::from("/tmp/README"), 3, stat());
        assert_eq!(entry.extension, "");
        assert_eq!(entry.selection_index, 3);
    }

    #[test]
    fn auto_padding_follows_batch_size() {
        let config = RenameConfig::new("Photo");
        assert_eq!(config.padding_width(1), 0);
        assert_eq!(config.padding_width(9), 0);
        assert_eq!(config.padding_width(10), 2);
        assert_eq!(config.padding_width(99), 2);
        assert_eq!(config.padding_width(100), 3);
        assert_eq!(config.padding_width(1000), 4);
    }

    #[test]
    fn auto_padding_widens_for_large_start_numbers() {
        let config = RenameConfig::new("Photo").with_start_number(995);
        assert_eq!(config.padding_width(10), 4);
        // small batches stay unpadded regardless of start
        assert_eq!(config.padding_width(5), 0);
    }

    #[test]
    fn fixed_padding_ignores_count() {
        let config = RenameConfig::new("Photo").with_padding(PaddingMode::Fixed(4));
        assert_eq!(config.padding_width(1), 4);
        assert_eq!(config.padding_width(500), 4);
    }

    #[test]
    fn padding_mode_parses_user_strings() {
        assert_eq!("auto".parse::<PaddingMode>(), Ok(PaddingMode::Auto));
        assert_eq!("none".parse::<PaddingMode>(), Ok(PaddingMode::Fixed(0)));
        assert_eq!("3".parse::<PaddingMode>(), Ok(PaddingMode::Fixed(3)));
        assert!("wide".parse::<PaddingMode>().is_err());
        assert!("12".parse::<PaddingMode>().is_err());
    }

    #[test]
    fn config_serializes_with_readable_enums() {
        let config = RenameConfig::new("Trip")
            .with_padding(PaddingMode::Fixed(3))
            .with_sort(SortKey::ModifiedDesc)
            .with_conflict(ConflictStrategy::Suffix);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"padding\":\"3\""));
        assert!(json.contains("\"sort\":\"modified-desc\""));
        assert!(json.contains("\"conflict\":\"suffix\""));

        let parsed: RenameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn config_fills_missing_fields_with_defaults() {
        let parsed: RenameConfig = serde_json::from_str(r#"{"base_name":"X"}"#).unwrap();
        assert_eq!(parsed.separator, "_");
        assert_eq!(parsed.start_number, 1);
        assert_eq!(parsed.conflict, ConflictStrategy::AutoIncrement);
    }

    #[test]
    fn summary_counts_outcomes() {
        let results = vec![
            RenameResult::applied("a".into(), "b".into()),
            RenameResult::skipped("c".into(), "d".into(), "conflict"),
            RenameResult::failed("e".into(), "f".into(), FailureReason::Locked, "busy"),
            RenameResult::applied("g".into(), "h".into()),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn session_ids_are_unique_and_time_ordered() {
        let a = Session::new(SessionKind::Rename, vec![]);
        let b = Session::new(SessionKind::Rename, vec![]);
        assert_ne!(a.id, b.id);
        assert!(a.id[..18] <= b.id[..18]);
    }
}
