use crate::constants::REPORT_HEADER;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Size and compliance figures for one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    /// Staged frames before quantization
    pub original_combined_size: u64,
    /// Staged frames after quantization
    pub compressed_combined_size: u64,
    /// `None` when the sequence could not be encoded
    pub apng_size: Option<u64>,
    #[serde(rename = "meets_500kb_limit")]
    pub meets_limit: bool,
    #[serde(rename = "additional_opt_req")]
    pub additional_optimization: Option<u64>,
}

pub fn meets_limit(artifact_size: u64, limit: u64) -> bool {
    artifact_size <= limit
}

/// Bytes the artifact is over the limit, 0 when compliant.
pub fn additional_optimization(artifact_size: u64, limit: u64) -> u64 {
    artifact_size.saturating_sub(limit)
}

impl ReportRow {
    pub fn encoded(
        name: impl Into<String>,
        original_combined_size: u64,
        compressed_combined_size: u64,
        apng_size: u64,
        limit: u64,
    ) -> Self {
        Self {
            name: name.into(),
            original_combined_size,
            compressed_combined_size,
            apng_size: Some(apng_size),
            meets_limit: meets_limit(apng_size, limit),
            additional_optimization: Some(additional_optimization(apng_size, limit)),
        }
    }

    /// Row for a sequence whose artifact is missing.
    pub fn failed(
        name: impl Into<String>,
        original_combined_size: u64,
        compressed_combined_size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            original_combined_size,
            compressed_combined_size,
            apng_size: None,
            meets_limit: false,
            additional_optimization: None,
        }
    }

    pub fn is_encoded(&self) -> bool {
        self.apng_size.is_some()
    }
}

/// Serialize `rows` as CSV into any writer. The header is always written.
pub fn write_report_to<W: std::io::Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|_| PipelineError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }
    let file = fs::File::create(path)?;
    write_report_to(file, rows)
}
