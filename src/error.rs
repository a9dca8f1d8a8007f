use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode or encode image {path}: {source}")]
    ImageProcessing {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Invalid quality range: {0}-{1}. Bounds must be within 0-100 and min <= max")]
    InvalidQualityRange(u8, u8),

    #[error("Invalid frame rate: {0}. Must be greater than zero")]
    InvalidFrameRate(u32),

    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),
}

/// Failures of the external quantizer and encoder collaborators.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} was not found on PATH")]
    NotFound { tool: String },

    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{tool} reported success but produced no output at {path}")]
    MissingOutput { tool: String, path: PathBuf },

    #[error("cannot encode a sequence with no frames")]
    EmptySequence,

    #[error("I/O error while preparing {tool} input: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
