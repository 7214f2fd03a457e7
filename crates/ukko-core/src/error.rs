use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UkkoError {
    #[error("not initialized: no {} directory found", .0.display())]
    SetupMissing(PathBuf),

    #[error("required file not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("'claude' command not found on PATH")]
    ExecutableNotFound,

    #[error("interrupted by operator")]
    Interrupted,

    #[error("launch failed: {0}")]
    Launch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, UkkoError>;
