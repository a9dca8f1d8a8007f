use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};

/// Validate the input folder and return its canonical form.
pub fn validate_input_dir(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_dir() {
        return Err(PipelineError::NotADirectory(path.to_path_buf()));
    }

    let canonical = path
        .canonicalize()
        .map_err(|_| PipelineError::FileNotFound(path.to_path_buf()))?;

    Ok(canonical)
}
