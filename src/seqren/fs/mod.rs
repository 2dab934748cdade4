//! # Filesystem Seam
//!
//! Everything that touches real files goes through the [`FileSystem`] trait so
//! that planning, execution and undo can be tested without a disk, the same way
//! the history log is split into a JSON store and an in-memory store.
//!
//! - [`os::OsFileSystem`]: production, backed by `std::fs`
//! - [`memory::MemoryFileSystem`]: tests; can simulate locked and protected files
//!
//! Implementations are shared with the background rename worker, hence the
//! `Send + Sync` bound.

use crate::model::{FileEntry, FileStat};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

pub mod memory;
pub mod os;

pub trait FileSystem: Send + Sync {
    /// Size and timestamps of a regular file.
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Whether anything (file, directory, dangling link) occupies `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Renames without any overwrite protection; callers check `exists` first.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Absolute spelling of `path` with `.`, `..` and links resolved.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The spelling used wherever paths are compared: selection dedup, history
/// records and lineage lookups.
///
/// A path that no longer exists is resolved through its parent directory, and
/// failing that, cleaned up lexically.
pub fn resolve<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> PathBuf {
    if let Ok(resolved) = fs.canonicalize(path) {
        return resolved;
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(dir) = fs.canonicalize(parent) {
            return dir.join(name);
        }
    }
    normalize_lexically(path)
}

/// Drops `.` components and folds `..` into the preceding component.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// A selected path that could not be captured.
#[derive(Debug)]
pub struct CaptureError {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Stats every path, numbering the captured entries in selection order.
///
/// Unreadable paths are returned separately rather than failing the batch.
/// Paths are [`resolve`]d first, so a file selected twice (under any
/// spelling) is captured once.
pub fn capture<F: FileSystem + ?Sized>(
    fs: &F,
    paths: &[PathBuf],
) -> (Vec<FileEntry>, Vec<CaptureError>) {
    let mut entries = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for path in paths {
        let resolved = resolve(fs, path);
        if !seen.insert(resolved.clone()) {
            continue;
        }
        match fs.stat(&resolved) {
            Ok(stat) => {
                let index = entries.len();
                entries.push(FileEntry::new(resolved, index, stat));
            }
            Err(error) => errors.push(CaptureError {
                path: path.clone(),
                error,
            }),
        }
    }
    (entries, errors)
}
