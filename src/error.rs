use std::path::PathBuf;

use thiserror::Error;

/// Failures around the statistical model artifact.
///
/// None of these ever reach a `classify` caller: the adapter treats every
/// variant as "no statistical signal" and the engine falls back to rules.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("incompatible model artifact: {0}")]
    Incompatible(String),

    #[error("model scoring failed: {0}")]
    Scoring(String),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
