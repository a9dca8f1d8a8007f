use crate::batch::NormalizedSequence;
use crate::error::{Result, ToolError};
use crate::layout::OutputLayout;
use crate::report::ReportRow;
use crate::tools::{EncodeParams, Encoder};
use crate::utils::{format_file_size, total_file_size};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Encoder settings shared by every sequence in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSettings {
    pub frame_rate: u32,
    pub plays: u32,
    pub size_limit: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateSummary {
    /// One row per sequence, in discovery order
    pub rows: Vec<ReportRow>,
    pub failed: Vec<String>,
}

impl AggregateSummary {
    pub fn encoded(&self) -> usize {
        self.rows.len() - self.failed.len()
    }
}

pub fn static_preview_path(layout: &OutputLayout, name: &str) -> PathBuf {
    layout.static_dir.join(format!("{}.png", name))
}

pub fn artifact_path(layout: &OutputLayout, name: &str, unique_id: &Uuid) -> PathBuf {
    layout.animated_dir.join(format!("{}_{}.png", name, unique_id))
}

/// Copy the preview, encode the animation and measure one sequence.
///
/// Encoder failures produce a row without an artifact size instead of an
/// error. I/O failures on the preview or the staged frames are fatal.
pub fn aggregate_sequence(
    normalized: &NormalizedSequence,
    layout: &OutputLayout,
    encoder: &dyn Encoder,
    settings: &AggregateSettings,
) -> Result<ReportRow> {
    let name = normalized.sequence.name.as_str();

    if let Some(first) = normalized.frames.first() {
        let preview = static_preview_path(layout, name);
        fs::copy(first, &preview)?;
        crate::verbose!("Static preview {:?}", preview);
    }

    // Measured before the encoder renames the frames
    let compressed_bytes = total_file_size(&normalized.frames)?;

    let params = EncodeParams {
        frame_rate: settings.frame_rate,
        plays: settings.plays,
        frame_prefix: name.to_string(),
        output: artifact_path(layout, name, &Uuid::new_v4()),
    };

    let artifact_size = encoder
        .encode(&normalized.frames, &params)
        .and_then(|artifact| {
            fs::metadata(&artifact)
                .map(|m| m.len())
                .map_err(|_| ToolError::MissingOutput {
                    tool: encoder.name().to_string(),
                    path: artifact,
                })
        });

    match artifact_size {
        Ok(size) => Ok(ReportRow::encoded(
            name,
            normalized.normalized_bytes,
            compressed_bytes,
            size,
            settings.size_limit,
        )),
        Err(e) => {
            crate::warn!("Failed to encode sequence '{}': {}", name, e);
            Ok(ReportRow::failed(
                name,
                normalized.normalized_bytes,
                compressed_bytes,
            ))
        }
    }
}

/// Aggregate every sequence sequentially, keeping discovery order.
pub fn aggregate_sequences(
    sequences: &[NormalizedSequence],
    layout: &OutputLayout,
    encoder: &dyn Encoder,
    settings: &AggregateSettings,
) -> Result<AggregateSummary> {
    let mut summary = AggregateSummary::default();
    let total = sequences.len();

    crate::info!(
        "🎞️  Encoding {} sequences with {} at {} fps...",
        total,
        encoder.name(),
        settings.frame_rate
    );

    for (index, normalized) in sequences.iter().enumerate() {
        let row = aggregate_sequence(normalized, layout, encoder, settings)?;

        match row.apng_size {
            Some(size) => crate::info!(
                "  [{}/{}] {} -> {} ({})",
                index + 1,
                total,
                row.name,
                format_file_size(size),
                if row.meets_limit {
                    "within limit"
                } else {
                    "over limit"
                }
            ),
            None => summary.failed.push(row.name.clone()),
        }

        summary.rows.push(row);
    }

    crate::info!(
        "✅ Final processing complete. {}/{} sequences encoded.",
        summary.encoded(),
        total
    );

    Ok(summary)
}
