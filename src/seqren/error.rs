use std::path::PathBuf;
use thiserror::Error;

/// Crate-level failures.
///
/// Per-file problems (invalid names, conflicts, locked files, undo state
/// drift) never show up here: they are reported per entry in the plan or in
/// the result list. Only conditions that stop an operation as a whole do.
#[derive(Error, Debug)]
pub enum SeqrenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History file {path} could not be written: {source}")]
    HistoryUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Worker error: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, SeqrenError>;
