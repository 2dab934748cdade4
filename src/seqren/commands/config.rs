use crate::commands::{CmdMessage, CmdResult, SeqrenPaths};
use crate::error::Result;
use crate::model::RenameConfig;
use crate::settings::AppSettings;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &SeqrenPaths, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let settings = AppSettings::load(&paths.home);
            Ok(CmdResult::default().with_settings(settings))
        }
        ConfigAction::ShowKey(key) => {
            let settings = AppSettings::load(&paths.home);
            let mut result = CmdResult::default();
            match settings.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut settings = AppSettings::load(&paths.home);
            if let Err(e) = settings.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            settings.save(&paths.home)?;
            let display_val = settings.get(&key).unwrap_or_else(|| value.clone());
            let mut result = CmdResult::default().with_settings(settings);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

/// Stores `config` as the last one used.
pub fn remember(paths: &SeqrenPaths, config: &RenameConfig) -> Result<()> {
    let mut settings = AppSettings::load(&paths.home);
    if settings.last_config != *config {
        settings.last_config = config.clone();
        settings.save(&paths.home)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::SortKey;
    use tempfile::tempdir;

    fn paths() -> (tempfile::TempDir, SeqrenPaths) {
        let dir = tempdir().unwrap();
        let paths = SeqrenPaths {
            home: dir.path().to_path_buf(),
        };
        (dir, paths)
    }

    #[test]
    fn set_then_show_key() {
        let (_dir, paths) = paths();
        let res = run(
            &paths,
            ConfigAction::Set("padding".to_string(), "none".to_string()),
        )
        .unwrap();
        assert_eq!(res.messages[0].content, "padding set to none");

        let res = run(&paths, ConfigAction::ShowKey("padding".to_string())).unwrap();
        assert_eq!(res.messages[0].content, "none");
    }

    #[test]
    fn invalid_values_are_errors_not_failures() {
        let (_dir, paths) = paths();
        let res = run(
            &paths,
            ConfigAction::Set("base_name".to_string(), "a:b".to_string()),
        )
        .unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);

        let res = run(&paths, ConfigAction::ShowKey("nope".to_string())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);
    }

    #[test]
    fn remember_saves_last_config() {
        let (_dir, paths) = paths();
        let config = RenameConfig::new("Trip").with_sort(SortKey::Selection);
        remember(&paths, &config).unwrap();

        let res = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(res.settings.unwrap().last_config, config);
    }
}
