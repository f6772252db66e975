use std::path::PathBuf;
use thiserror::Error;

use crate::verify::{Verdict, VerifyReport};

/// The main error type for yolo-verify operations.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A label file exists but could not be read as UTF-8 text.
    #[error("Failed to read label file {path}: {source}")]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory {path}: {source}")]
    Traverse {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid class list: {0}")]
    InvalidClassList(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Dataset verification failed ({verdict})")]
    VerificationFailed {
        verdict: Verdict,
        report: Box<VerifyReport>,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
