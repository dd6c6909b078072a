use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PurseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    Query(#[from] regex::Error),

    #[error("MISSING_PROFILE: {} does not exist", .0.display())]
    MissingProfile(PathBuf),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Sort key '{0}' only applies to summaries")]
    SummaryOnlySortKey(String),

    #[error("Unknown summary key: {0}")]
    UnknownGroupKey(String),

    #[error("EDITOR environment variable is unset")]
    EditorUnset,

    #[error("{0}: Permission denied")]
    EditorPermission(String),

    #[error("{0}: command not found")]
    EditorNotFound(String),

    #[error("{program} exited with status {code}")]
    EditorFailed { program: String, code: i32 },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PurseError>;
