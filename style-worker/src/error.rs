//! Worker and inference errors.

use std::path::PathBuf;

use thiserror::Error;

/// Why a task produced no result image.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Failed to start inference process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Inference exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("Inference finished but wrote no result at {0}")]
    MissingOutput(PathBuf),

    #[error("Inference panicked: {0}")]
    Panicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Submitting to a queue whose worker is gone.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    #[error("Task queue is closed")]
    Closed,
}
