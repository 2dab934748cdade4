use crate::commands::{CmdMessage, CmdResult, SeqrenPaths};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::settings::AppSettings;
use std::path::PathBuf;

/// Points the history log at `path` and remembers the choice in settings.
pub fn run<H: HistoryStore + ?Sized>(
    history: &mut H,
    paths: &SeqrenPaths,
    path: PathBuf,
    migrate: bool,
) -> Result<CmdResult> {
    let added = history.set_storage_location(path.clone(), migrate)?;

    let mut settings = AppSettings::load(&paths.home);
    settings.history_path = Some(path.clone());
    settings.save(&paths.home)?;

    let mut result = CmdResult::default().with_settings(settings);
    result.add_message(CmdMessage::success(format!(
        "History now stored at {}",
        path.display()
    )));
    if migrate {
        result.add_message(CmdMessage::info(format!(
            "Migrated {} session(s); the previous file was left in place.",
            added
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::json::JsonHistoryStore;
    use crate::model::{RenameRecord, Session, SessionKind};
    use tempfile::tempdir;

    fn rename_session(from: &str, to: &str) -> Session {
        Session::new(
            SessionKind::Rename,
            vec![RenameRecord {
                directory: PathBuf::from("/p"),
                original_name: String::new(),
                previous_name: from.to_string(),
                new_name: to.to_string(),
            }],
        )
    }

    #[test]
    fn relocates_migrates_and_persists_choice() {
        let dir = tempdir().unwrap();
        let paths = SeqrenPaths {
            home: dir.path().join("home"),
        };
        let mut history = JsonHistoryStore::in_dir(&paths.home);
        history.append(rename_session("a.jpg", "X_1.jpg")).unwrap();
        let target = dir.path().join("shared").join("history.json");

        let res = run(&mut history, &paths, target.clone(), true).unwrap();

        assert!(res.messages[1].content.contains("Migrated 1"));
        assert_eq!(history.list_sessions().unwrap().len(), 1);
        assert!(paths.home.join("history.json").exists());
        let settings = AppSettings::load(&paths.home);
        assert_eq!(settings.history_path, Some(target.clone()));
        assert_eq!(settings.history_file(&paths.home), target);
    }

    #[test]
    fn migration_reports_only_sessions_it_added() {
        let dir = tempdir().unwrap();
        let paths = SeqrenPaths {
            home: dir.path().join("home"),
        };
        let target = dir.path().join("shared").join("history.json");

        let mut history = JsonHistoryStore::in_dir(&paths.home);
        history.append(rename_session("a.jpg", "X_1.jpg")).unwrap();
        history.append(rename_session("b.jpg", "X_2.jpg")).unwrap();
        run(&mut history, &paths, target.clone(), true).unwrap();

        // back home, one more session, then migrate again
        let mut history = JsonHistoryStore::in_dir(&paths.home);
        history.append(rename_session("c.jpg", "X_3.jpg")).unwrap();
        let res = run(&mut history, &paths, target, true).unwrap();

        assert!(res.messages[1].content.contains("Migrated 1 session(s)"));
        assert_eq!(history.list_sessions().unwrap().len(), 3);
    }
}
