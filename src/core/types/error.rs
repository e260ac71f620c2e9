use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid ignore glob: {0}")]
    IgnoreGlob(#[from] globset::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No run directories found in {}", .0.display())]
    NoRuns(PathBuf),

    #[error("No valid runs could be extracted from {}", .0.display())]
    NoValidRuns(PathBuf),

    #[error("No experiments could be aggregated under {}", .0.display())]
    NoExperiments(PathBuf),

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    /// True for failures that only mean "this experiment had nothing to aggregate"
    pub fn is_empty_experiment(&self) -> bool {
        matches!(self, AppError::NoRuns(_) | AppError::NoValidRuns(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
