use seqren::api::{MessageLevel, SeqrenApi, SeqrenPaths};
use seqren::fs::os::OsFileSystem;
use seqren::history::json::JsonHistoryStore;
use seqren::history::HistoryStore;
use seqren::model::{RenameConfig, SessionKind};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn api(home: &Path) -> SeqrenApi<JsonHistoryStore, OsFileSystem> {
    SeqrenApi::new(
        JsonHistoryStore::in_dir(home),
        OsFileSystem::new(),
        SeqrenPaths {
            home: home.to_path_buf(),
        },
    )
}

fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, name.as_bytes()).unwrap();
            path
        })
        .collect()
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn chained_targets_rename_and_undo_on_disk() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let dir = temp.path().join("files");
    fs::create_dir_all(&dir).unwrap();

    // Photo_2.txt sorts first, so it moves to Photo_1.txt and frees its name
    let files = write_files(&dir, &["zebra.txt", "Photo_2.txt"]);
    let mut api = api(&home);

    let preview = api.preview(&files, &RenameConfig::new("Photo")).unwrap();
    assert!(!preview.has_errors());
    assert_eq!(names_in(&dir), vec!["Photo_2.txt", "zebra.txt"]);

    let applied = api.apply(preview.plan, |_| {}).unwrap();
    assert!(!applied.has_errors());
    assert_eq!(applied.summary.unwrap().applied, 2);
    assert_eq!(names_in(&dir), vec!["Photo_1.txt", "Photo_2.txt"]);
    assert_eq!(fs::read(dir.join("Photo_1.txt")).unwrap(), b"Photo_2.txt");
    assert_eq!(fs::read(dir.join("Photo_2.txt")).unwrap(), b"zebra.txt");

    // no parked temporaries left behind
    assert!(names_in(&dir).iter().all(|n| !n.ends_with(".tmp")));

    let origin = api.origin(&dir.join("Photo_2.txt")).unwrap();
    assert_eq!(origin.messages[0].content, "zebra.txt");

    let undone = api.undo("latest", |_| {}).unwrap();
    assert!(!undone.has_errors());
    assert_eq!(names_in(&dir), vec!["Photo_2.txt", "zebra.txt"]);
    assert_eq!(fs::read(dir.join("zebra.txt")).unwrap(), b"zebra.txt");
}

#[test]
fn history_survives_a_new_process() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let dir = temp.path().join("files");
    fs::create_dir_all(&dir).unwrap();
    let files = write_files(&dir, &["one.md", "two.md"]);

    {
        let mut api = api(&home);
        let preview = api.preview(&files, &RenameConfig::new("Note")).unwrap();
        api.apply(preview.plan, |_| {}).unwrap();
    }

    let dir = fs::canonicalize(&dir).unwrap();
    let store = JsonHistoryStore::in_dir(&home);
    let sessions = store.list_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].kind, SessionKind::Rename);
    assert_eq!(
        store.original_name_of(&dir.join("Note_2.md")).unwrap(),
        Some("two.md".to_string())
    );

    let listed = api(&home).list_history().unwrap();
    assert_eq!(listed.sessions.len(), 1);
}

#[test]
fn missing_selection_is_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("files");
    fs::create_dir_all(&dir).unwrap();
    let mut files = write_files(&dir, &["keep.txt"]);
    files.push(dir.join("gone.txt"));

    let preview = api(&temp.path().join("home"))
        .preview(&files, &RenameConfig::new("K"))
        .unwrap();
    assert_eq!(preview.plan.len(), 1);
    assert!(preview
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Warning && m.content.contains("gone.txt")));
}

#[test]
fn origin_finds_files_renamed_through_a_dot_dot_path() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let dir = temp.path().join("files");
    fs::create_dir_all(dir.join("sub")).unwrap();
    write_files(&dir, &["a.txt"]);
    let mut api = api(&home);

    let detour = dir.join("sub").join("..").join("a.txt");
    let preview = api.preview(&[detour], &RenameConfig::new("N")).unwrap();
    api.apply(preview.plan, |_| {}).unwrap();
    assert_eq!(names_in(&dir), vec!["N_1.txt", "sub"]);

    let origin = api.origin(&dir.join("N_1.txt")).unwrap();
    assert_eq!(origin.messages[0].level, MessageLevel::Info);
    assert_eq!(origin.messages[0].content, "a.txt");

    let session = &api.list_history().unwrap().sessions[0];
    assert!(!session.records[0]
        .directory
        .components()
        .any(|c| c == std::path::Component::ParentDir));
}

#[test]
fn one_file_selected_under_two_spellings_is_renamed_once() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("files");
    fs::create_dir_all(dir.join("sub")).unwrap();
    write_files(&dir, &["a.txt"]);
    let mut api = api(&temp.path().join("home"));

    let files = vec![dir.join("a.txt"), dir.join("sub").join("..").join("a.txt")];
    let preview = api.preview(&files, &RenameConfig::new("N")).unwrap();
    assert_eq!(preview.plan.len(), 1);

    let applied = api.apply(preview.plan, |_| {}).unwrap();
    assert!(!applied.has_errors());
    assert_eq!(applied.results.len(), 1);
    assert_eq!(names_in(&dir), vec!["N_1.txt", "sub"]);
}
