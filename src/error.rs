//! Error types for the evaluation pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Every way an evaluation run can fail. None of these are retried.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to load model {}: {message}", path.display())]
    ModelLoad { path: PathBuf, message: String },

    #[error("Unsupported model input: {0}")]
    UnsupportedInput(String),

    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Inference failed for {}: {message}", path.display())]
    Inference { path: PathBuf, message: String },

    #[error("Class folder not found: {}", .0.display())]
    MissingClass(PathBuf),

    #[error("No samples found in {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("Invalid label catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
}
