//! # Settings
//!
//! Application settings live in `settings.json` inside the seqren home
//! directory (the platform config dir from [`directories`], or `--home` /
//! `SEQREN_HOME`).
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `base_name` | (empty) | Base name used when `--name` is not given |
//! | `separator` | `_` | Between base name and number |
//! | `start` | `1` | First sequence number |
//! | `padding` | `auto` | `auto`, `none` or a digit count 1-9 |
//! | `sort` | `alphabetical` | Numbering order |
//! | `conflict` | `auto-increment` | `skip`, `suffix`, `auto-increment`, `prompt` |
//! | `history_path` | (home)/history.json | Read-only here; change with `seqren storage` |
//!
//! The naming keys hold the last configuration used for a rename.

use crate::error::{Result, SeqrenError};
use crate::history::HISTORY_FILENAME;
use crate::model::RenameConfig;
use crate::validate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const SETTINGS_FILENAME: &str = "settings.json";

pub const KEYS: &[&str] = &[
    "base_name",
    "separator",
    "start",
    "padding",
    "sort",
    "conflict",
    "history_path",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Custom location of the history log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,

    #[serde(default)]
    pub last_config: RenameConfig,
}

impl AppSettings {
    /// Load settings from the given directory.
    ///
    /// A missing file gives defaults; so does an unreadable one, with a warning.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let path = dir.as_ref().join(SETTINGS_FILENAME);
        if !path.exists() {
            return Self::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(SeqrenError::from)
            .and_then(|content| serde_json::from_str(&content).map_err(SeqrenError::from));
        match parsed {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(SETTINGS_FILENAME), content)?;
        Ok(())
    }

    /// History file in effect for the home directory `dir`.
    pub fn history_file(&self, dir: &Path) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| dir.join(HISTORY_FILENAME))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let c = &self.last_config;
        match key {
            "base_name" => Some(c.base_name.clone()),
            "separator" => Some(c.separator.clone()),
            "start" => Some(c.start_number.to_string()),
            "padding" => Some(c.padding.to_string()),
            "sort" => Some(c.sort.to_string()),
            "conflict" => Some(c.conflict.to_string()),
            "history_path" => Some(
                self.history_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(default)".to_string()),
            ),
            _ => None,
        }
    }

    /// Sets one naming key, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let c = &mut self.last_config;
        match key {
            "base_name" => {
                validate::validate_base_name(value).map_err(|e| e.to_string())?;
                c.base_name = value.to_string();
            }
            "separator" => {
                validate::validate_separator(value).map_err(|e| e.to_string())?;
                c.separator = value.to_string();
            }
            "start" => {
                let start: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid start number: {}", value))?;
                validate::validate_start_number(start).map_err(|e| e.to_string())?;
                c.start_number = start;
            }
            "padding" => c.padding = value.parse()?,
            "sort" => c.sort = value.parse()?,
            "conflict" => c.conflict = value.parse()?,
            "history_path" => {
                return Err("history_path is changed with `seqren storage <PATH>`".to_string())
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaddingMode, SortKey};
    use tempfile::tempdir;

    #[test]
    fn load_missing_settings_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(AppSettings::load(dir.path()), AppSettings::default());
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "[[[").unwrap();
        assert_eq!(AppSettings::load(dir.path()), AppSettings::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let mut settings = AppSettings::default();
        settings.set("base_name", "Trip").unwrap();
        settings.set("padding", "3").unwrap();
        settings.history_path = Some(dir.path().join("elsewhere.json"));
        settings.save(dir.path().join("home")).unwrap();

        let loaded = AppSettings::load(dir.path().join("home"));
        assert_eq!(loaded, settings);
        assert_eq!(loaded.last_config.padding, PaddingMode::Fixed(3));
    }

    #[test]
    fn history_file_defaults_to_home() {
        let settings = AppSettings::default();
        assert_eq!(
            settings.history_file(Path::new("/home/u/.seqren")),
            PathBuf::from("/home/u/.seqren/history.json")
        );
    }

    #[test]
    fn set_validates_values() {
        let mut settings = AppSettings::default();
        assert!(settings.set("base_name", "CON").is_err());
        assert!(settings.set("separator", "|").is_err());
        assert!(settings.set("start", "-1").is_err());
        assert!(settings.set("start", "1000000").is_err());
        assert!(settings.set("sort", "sideways").is_err());
        assert!(settings.set("colour", "blue").is_err());
        assert!(settings.set("history_path", "/tmp/x").is_err());

        settings.set("sort", "modified-desc").unwrap();
        assert_eq!(settings.last_config.sort, SortKey::ModifiedDesc);
        assert_eq!(settings.get("sort").as_deref(), Some("modified-desc"));
        assert_eq!(settings.get("start").as_deref(), Some("1"));
        assert!(settings.get("colour").is_none());
    }
}
