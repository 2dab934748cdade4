//! Name validation.
//!
//! The rules are the union of what Windows forbids, applied on every platform
//! so that a batch renamed on Linux can still be copied to a Windows share.

use crate::model::RenameConfig;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
pub const MAX_FILENAME_LENGTH: usize = 255;
/// Windows `MAX_PATH`, in characters.
pub const MAX_PATH_LENGTH: usize = 260;
pub const MAX_SEPARATOR_LENGTH: usize = 5;
pub const MAX_START_NUMBER: u32 = 999_999;

static RESERVED_NAMES: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut names: HashSet<String> = ["CON", "PRN", "AUX", "NUL"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for n in 1..=9 {
        names.insert(format!("COM{}", n));
        names.insert(format!("LPT{}", n));
    }
    names
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidName {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name contains forbidden characters: {0}")]
    ForbiddenChars(String),

    #[error("'{0}' is a reserved system name and cannot be used")]
    Reserved(String),

    #[error("Name cannot have leading or trailing spaces")]
    SurroundingWhitespace,

    #[error("Name cannot end with a period")]
    TrailingPeriod,

    #[error("Name too long ({0} > {max} bytes)", max = MAX_FILENAME_LENGTH)]
    TooLong(usize),

    #[error("Full path too long ({0} > {max} characters)", max = MAX_PATH_LENGTH)]
    PathTooLong(usize),

    #[error("Separator is too long (max {max} characters)", max = MAX_SEPARATOR_LENGTH)]
    SeparatorTooLong,

    #[error("Start number must be at most {max}", max = MAX_START_NUMBER)]
    StartTooLarge,
}

pub fn validate_base_name(name: &str) -> Result<(), InvalidName> {
    if name.trim().is_empty() {
        return Err(InvalidName::Empty);
    }
    check_characters(name)?;
    if is_reserved(name) {
        return Err(InvalidName::Reserved(name.to_string()));
    }
    if name != name.trim() {
        return Err(InvalidName::SurroundingWhitespace);
    }
    if name.ends_with('.') {
        return Err(InvalidName::TrailingPeriod);
    }
    Ok(())
}

/// The separator may be empty.
pub fn validate_separator(separator: &str) -> Result<(), InvalidName> {
    check_characters(separator)?;
    if separator.chars().count() > MAX_SEPARATOR_LENGTH {
        return Err(InvalidName::SeparatorTooLong);
    }
    Ok(())
}

pub fn validate_start_number(start: u32) -> Result<(), InvalidName> {
    if start > MAX_START_NUMBER {
        return Err(InvalidName::StartTooLarge);
    }
    Ok(())
}

/// Checks a complete generated file name (base, separator, number, extension).
pub fn validate_target_name(name: &str) -> Result<(), InvalidName> {
    validate_base_name(name)?;
    if name.len() > MAX_FILENAME_LENGTH {
        return Err(InvalidName::TooLong(name.len()));
    }
    Ok(())
}

/// Checks the full destination path, so a long directory plus a long name
/// still fits the Windows limit.
pub fn validate_path_length(path: &Path) -> Result<(), InvalidName> {
    let length = path.to_string_lossy().chars().count();
    if length > MAX_PATH_LENGTH {
        return Err(InvalidName::PathTooLong(length));
    }
    Ok(())
}

pub fn validate_config(config: &RenameConfig) -> Result<(), InvalidName> {
    validate_base_name(&config.base_name)?;
    validate_separator(&config.separator)?;
    validate_start_number(config.start_number)
}

/// Device names are reserved with any extension: `CON`, `con.txt`, `Nul.tar.gz`.
fn is_reserved(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).trim_end();
    RESERVED_NAMES.contains(&stem.to_ascii_uppercase())
}

fn check_characters(name: &str) -> Result<(), InvalidName> {
    let mut found: Vec<String> = Vec::new();
    for c in name.chars() {
        let label = if FORBIDDEN_CHARS.contains(&c) {
            c.to_string()
        } else if c.is_control() {
            format!("U+{:04X}", c as u32)
        } else {
            continue;
        };
        if !found.contains(&label) {
            found.push(label);
        }
    }
    if found.is_empty() {
        Ok(())
    } else {
        Err(InvalidName::ForbiddenChars(found.join(", ")))
    }
}
