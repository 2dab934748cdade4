//! # Plan Builder
//!
//! Turns a selection plus a [`RenameConfig`] into one [`PlanEntry`] per file.
//! Nothing is renamed here; the plan is what the preview shows and what the
//! executor later applies.
//!
//! ## Conflicts
//!
//! A candidate name conflicts when it is
//! - occupied on disk by a file that is **not** part of the selection, or
//! - already assigned to an earlier entry of the same plan (per directory).
//!
//! Names held by selected files are free to reuse because those files move
//! away during execution. The exception is a selected file that will *not*
//! move (skipped, invalid): its name stays occupied. Planning therefore runs
//! to a fixpoint, pinning the names of non-moving files and re-planning until
//! the set of pinned names stops growing. The set only grows, so this ends
//! after at most one extra pass per file.
//!
//! ## Guarantee
//!
//! Among `Ok` and `ConflictResolved` entries, target names are pairwise unique
//! per directory and disjoint from every file that will still exist under that
//! name when the batch runs.

use crate::fs::FileSystem;
use crate::model::{ConflictStrategy, FileEntry, PlanEntry, PlanStatus, RenameConfig, SortKey};
use crate::validate::{validate_config, validate_path_length, validate_target_name};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const UNCHANGED_REASON: &str = "name unchanged";
const PROMPT_UNSUPPORTED: &str = "target exists; per-conflict prompting is not supported, skipped";

type NameKey = (PathBuf, String);

pub fn build_plan<F: FileSystem + ?Sized>(
    files: &[FileEntry],
    config: &RenameConfig,
    fs: &F,
) -> Vec<PlanEntry> {
    let sorted = sort_entries(files, config.sort);

    if let Err(e) = validate_config(config) {
        let width = config.padding_width(sorted.len());
        return sorted
            .iter()
            .enumerate()
            .map(|(i, file)| PlanEntry {
                source: (*file).clone(),
                target_name: sequence_name(config, number_at(config, i), width, &file.extension),
                status: PlanStatus::Invalid,
                reason: Some(e.to_string()),
            })
            .collect();
    }

    let mut pinned: HashSet<NameKey> = HashSet::new();
    loop {
        let plan = plan_pass(&sorted, config, fs, &pinned);
        let staying: HashSet<NameKey> = plan
            .iter()
            .filter(|e| !matches!(e.status, PlanStatus::Ok | PlanStatus::ConflictResolved))
            .map(|e| key_for(e.source.directory(), &e.source.name))
            .collect();
        if staying.is_subset(&pinned) {
            return plan;
        }
        debug!(
            pinned = staying.len(),
            "re-planning around files that keep their names"
        );
        pinned.extend(staying);
    }
}

/// Orders files for numbering. Ties always fall back to selection order.
pub fn sort_entries(files: &[FileEntry], key: SortKey) -> Vec<&FileEntry> {
    let mut sorted: Vec<&FileEntry> = files.iter().collect();
    sorted.sort_by(|a, b| {
        let primary = match key {
            SortKey::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::ModifiedAsc => a.modified.cmp(&b.modified),
            SortKey::ModifiedDesc => b.modified.cmp(&a.modified),
            SortKey::CreatedAsc => a.created.cmp(&b.created),
            SortKey::CreatedDesc => b.created.cmp(&a.created),
            SortKey::Selection => Ordering::Equal,
        };
        primary.then(a.selection_index.cmp(&b.selection_index))
    });
    sorted
}

/// `base + separator + zero-padded number + extension`
pub fn sequence_name(config: &RenameConfig, number: u64, width: usize, extension: &str) -> String {
    format!(
        "{}{}{:0width$}{}",
        config.base_name,
        config.separator,
        number,
        extension,
        width = width
    )
}

fn number_at(config: &RenameConfig, position: usize) -> u64 {
    config.start_number as u64 + position as u64
}

struct Namespace<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    selected: HashSet<NameKey>,
    pinned: &'a HashSet<NameKey>,
    assigned: HashSet<NameKey>,
}

impl<F: FileSystem + ?Sized> Namespace<'_, F> {
    fn is_taken(&self, dir: &Path, name: &str) -> bool {
        let key = key_for(dir, name);
        if self.assigned.contains(&key) || self.pinned.contains(&key) {
            return true;
        }
        !self.selected.contains(&key) && self.fs.exists(&dir.join(name))
    }

    fn assign(&mut self, dir: &Path, name: &str) {
        self.assigned.insert(key_for(dir, name));
    }
}

fn plan_pass<F: FileSystem + ?Sized>(
    sorted: &[&FileEntry],
    config: &RenameConfig,
    fs: &F,
    pinned: &HashSet<NameKey>,
) -> Vec<PlanEntry> {
    let width = config.padding_width(sorted.len());
    let mut names = Namespace {
        fs,
        selected: sorted
            .iter()
            .map(|f| key_for(f.directory(), &f.name))
            .filter(|k| !pinned.contains(k))
            .collect(),
        pinned,
        assigned: HashSet::new(),
    };

    let mut plan = Vec::with_capacity(sorted.len());
    for (i, file) in sorted.iter().enumerate() {
        let dir = file.directory();
        let number = number_at(config, i);
        let candidate = sequence_name(config, number, width, &file.extension);

        let unchanged = candidate == file.name && !pinned.contains(&key_for(dir, &file.name));
        let (target_name, status, reason) = if unchanged && !names.is_taken(dir, &candidate) {
            (candidate, PlanStatus::Ok, Some(UNCHANGED_REASON.to_string()))
        } else if !names.is_taken(dir, &candidate) {
            (candidate, PlanStatus::Ok, None)
        } else {
            resolve(&names, config, file, candidate, number, width)
        };

        let checked = validate_target_name(&target_name)
            .and_then(|_| validate_path_length(&dir.join(&target_name)));
        let (status, reason) = match checked {
            Err(e) if status != PlanStatus::ConflictUnresolved => {
                (PlanStatus::Invalid, Some(e.to_string()))
            }
            _ => (status, reason),
        };

        if matches!(status, PlanStatus::Ok | PlanStatus::ConflictResolved) {
            names.assign(dir, &target_name);
        }
        plan.push(PlanEntry {
            source: (*file).clone(),
            target_name,
            status,
            reason,
        });
    }
    plan
}

fn resolve<F: FileSystem + ?Sized>(
    names: &Namespace<'_, F>,
    config: &RenameConfig,
    file: &FileEntry,
    candidate: String,
    number: u64,
    width: usize,
) -> (String, PlanStatus, Option<String>) {
    let dir = file.directory();
    match config.conflict {
        ConflictStrategy::Skip => (
            candidate.clone(),
            PlanStatus::ConflictUnresolved,
            Some(format!("{} already taken, skipped", candidate)),
        ),
        ConflictStrategy::Prompt => (
            candidate,
            PlanStatus::ConflictUnresolved,
            Some(PROMPT_UNSUPPORTED.to_string()),
        ),
        ConflictStrategy::Suffix => {
            let stem = &candidate[..candidate.len() - file.extension.len()];
            let resolved = (1u64..)
                .map(|n| match n {
                    1 => format!("{}_copy{}", stem, file.extension),
                    n => format!("{}_copy{}{}", stem, n, file.extension),
                })
                .find(|name| !names.is_taken(dir, name))
                .unwrap_or_else(|| candidate.clone());
            let reason = format!("{} already taken", candidate);
            (resolved, PlanStatus::ConflictResolved, Some(reason))
        }
        ConflictStrategy::AutoIncrement => {
            let resolved = (number + 1..)
                .map(|n| sequence_name(config, n, width, &file.extension))
                .find(|name| !names.is_taken(dir, name))
                .unwrap_or_else(|| candidate.clone());
            let reason = format!("{} already taken", candidate);
            (resolved, PlanStatus::ConflictResolved, Some(reason))
        }
    }
}

/// On case-insensitive platforms `a.JPG` and `A.jpg` name the same file.
fn key_for(dir: &Path, name: &str) -> NameKey {
    let name = if cfg!(any(windows, target_os = "macos")) {
        name.to_lowercase()
    } else {
        name.to_string()
    };
    (dir.to_path_buf(), name)
}

/// Entries the executor will actually rename.
pub fn executable_count(plan: &[PlanEntry]) -> usize {
    plan.iter().filter(|e| e.is_executable()).count()
}
