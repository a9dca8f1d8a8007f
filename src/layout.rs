use crate::constants::{
    ANIMATED_DIR_NAME, OUTPUT_TIMESTAMP_FORMAT, REPORT_FILE_NAME, STATIC_DIR_NAME, TEMP_DIR_NAME,
};
use crate::error::{PipelineError, Result};
use crate::processing::SizeClass;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory layout owned by a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub temp_dir: PathBuf,
    pub static_dir: PathBuf,
    pub animated_dir: PathBuf,
    pub report_path: PathBuf,
}

/// `<YYYYMMDD_HHMMSS>_<size>`
pub fn output_folder_name(timestamp: &DateTime<Local>, size_class: SizeClass) -> String {
    format!(
        "{}_{}",
        timestamp.format(OUTPUT_TIMESTAMP_FORMAT),
        size_class
    )
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            temp_dir: root.join(TEMP_DIR_NAME),
            static_dir: root.join(STATIC_DIR_NAME),
            animated_dir: root.join(ANIMATED_DIR_NAME),
            report_path: root.join(REPORT_FILE_NAME),
            root,
        }
    }

    /// Layout under `parent` named after the current local time and size class.
    pub fn timestamped(parent: &Path, size_class: SizeClass) -> Self {
        Self::new(parent.join(output_folder_name(&Local::now(), size_class)))
    }

    /// Create the staging, static and animated directories.
    pub fn create(&self) -> Result<()> {
        for dir in [&self.temp_dir, &self.static_dir, &self.animated_dir] {
            fs::create_dir_all(dir)
                .map_err(|_| PipelineError::DirectoryCreationFailed(dir.clone()))?;
        }
        Ok(())
    }
}
