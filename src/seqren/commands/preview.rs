use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::fs::{capture, FileSystem};
use crate::model::RenameConfig;
use crate::plan::{build_plan, executable_count};
use crate::validate::validate_config;
use std::path::PathBuf;

pub fn run<F: FileSystem + ?Sized>(
    fs: &F,
    paths: &[PathBuf],
    config: &RenameConfig,
) -> Result<CmdResult> {
    let (files, errors) = capture(fs, paths);
    let mut result = CmdResult::default();

    for e in &errors {
        result.add_message(CmdMessage::warning(format!(
            "Skipping {}: {}",
            e.path.display(),
            e.error
        )));
    }

    if files.is_empty() {
        result.add_message(CmdMessage::info("No files to rename."));
        return Ok(result);
    }

    if let Err(e) = validate_config(config) {
        result.add_message(CmdMessage::error(format!("Invalid configuration: {}", e)));
    }

    let plan = build_plan(&files, config, fs);
    let ready = executable_count(&plan);
    result.add_message(CmdMessage::info(format!(
        "{} of {} file(s) will be renamed.",
        ready,
        plan.len()
    )));
    Ok(result.with_plan(plan))
}
