use super::{normalize_lexically, FileSystem};
use crate::model::FileStat;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct MemFile {
    stat: FileStat,
    locked: bool,
    protected: bool,
}

/// In-memory filesystem for tests and development.
/// Does NOT touch the disk.
///
/// Files added without explicit timestamps get strictly increasing modified
/// times in insertion order, which keeps date-based sorting deterministic.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, MemFile>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>) -> Self {
        self.add_file(path);
        self
    }

    pub fn with_files<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add_file(path);
        }
        self
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        let mut files = self.lock_files();
        let modified = base_time() + Duration::seconds(files.len() as i64);
        files.insert(
            path.into(),
            MemFile {
                stat: FileStat {
                    size: 0,
                    modified,
                    created: Some(modified),
                },
                locked: false,
                protected: false,
            },
        );
    }

    pub fn add_file_with_stat(&self, path: impl Into<PathBuf>, stat: FileStat) {
        self.lock_files().insert(
            path.into(),
            MemFile {
                stat,
                locked: false,
                protected: false,
            },
        );
    }

    /// Simulates a file held open by another process.
    pub fn lock(&self, path: impl AsRef<Path>) {
        if let Some(file) = self.lock_files().get_mut(path.as_ref()) {
            file.locked = true;
        }
    }

    /// Simulates a file the current user may not rename.
    pub fn protect(&self, path: impl AsRef<Path>) {
        if let Some(file) = self.lock_files().get_mut(path.as_ref()) {
            file.protected = true;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.lock_files().remove(path.as_ref());
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock_files().contains_key(path.as_ref())
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock_files().keys().cloned().collect()
    }

    /// File names in `dir`, sorted.
    pub fn names_in(&self, dir: impl AsRef<Path>) -> Vec<String> {
        let dir = dir.as_ref();
        self.lock_files()
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect()
    }

    fn lock_files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MemFile>> {
        // A panic while holding the lock leaves the map itself intact.
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.lock_files()
            .get(path)
            .map(|f| f.stat)
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut files = self.lock_files();
        let file = files.get(from).ok_or_else(|| not_found(from))?;
        if file.locked {
            return Err(io::Error::new(
                io::ErrorKind::ResourceBusy,
                format!("{} is in use by another process", from.display()),
            ));
        }
        if file.protected {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", from.display()),
            ));
        }
        if files.contains_key(to) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", to.display()),
            ));
        }
        if let Some(file) = files.remove(from) {
            files.insert(to.to_path_buf(), file);
        }
        Ok(())
    }

    /// Lexical only; there are no links to follow.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(normalize_lexically(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_moves_entry() {
        let fs = MemoryFileSystem::new().with_file("/d/a.txt");
        fs.rename(Path::new("/d/a.txt"), Path::new("/d/b.txt"))
            .unwrap();
        assert_eq!(fs.names_in("/d"), vec!["b.txt".to_string()]);
    }

    #[test]
    fn rename_refuses_to_overwrite() {
        let fs = MemoryFileSystem::new().with_files(["/d/a.txt", "/d/b.txt"]);
        let err = fs
            .rename(Path::new("/d/a.txt"), Path::new("/d/b.txt"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert!(fs.contains("/d/a.txt"));
    }

    #[test]
    fn locked_and_protected_files_fail_to_rename() {
        let fs = MemoryFileSystem::new().with_files(["/d/a.txt", "/d/b.txt"]);
        fs.lock("/d/a.txt");
        fs.protect("/d/b.txt");

        let locked = fs
            .rename(Path::new("/d/a.txt"), Path::new("/d/x.txt"))
            .unwrap_err();
        assert_eq!(locked.kind(), io::ErrorKind::ResourceBusy);

        let protected = fs
            .rename(Path::new("/d/b.txt"), Path::new("/d/y.txt"))
            .unwrap_err();
        assert_eq!(protected.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn insertion_order_drives_modified_time() {
        let fs = MemoryFileSystem::new().with_files(["/d/z.txt", "/d/a.txt"]);
        let z = fs.stat(Path::new("/d/z.txt")).unwrap();
        let a = fs.stat(Path::new("/d/a.txt")).unwrap();
        assert!(z.modified < a.modified);
    }
}
