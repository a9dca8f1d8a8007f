use crate::aggregate::{aggregate_sequences, AggregateSettings};
use crate::batch::normalize_sequences;
use crate::constants::{DEFAULT_FRAME_RATE, LOOP_FOREVER, SIZE_LIMIT_BYTES};
use crate::discovery::discover_sequences;
use crate::error::{PipelineError, Result};
use crate::layout::OutputLayout;
use crate::processing::SizeClass;
use crate::quantize::compress_staging_tree;
use crate::report::{write_report, ReportRow};
use crate::tools::{Encoder, QualityRange, Quantizer};
use crate::utils::{calculate_compression_ratio, format_file_size};
use crate::validation::validate_input_dir;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub size_class: SizeClass,
    pub quality: QualityRange,
    pub frame_rate: u32,
    pub size_limit: u64,
}

impl PipelineOptions {
    pub fn new(size_class: SizeClass) -> Self {
        Self {
            size_class,
            quality: QualityRange::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            size_limit: SIZE_LIMIT_BYTES,
        }
    }

    pub fn with_quality(mut self, min: u8, max: u8) -> Result<Self> {
        self.quality = QualityRange::new(min, max)?;
        Ok(self)
    }

    pub fn with_frame_rate(mut self, frame_rate: u32) -> Result<Self> {
        if frame_rate == 0 {
            return Err(PipelineError::InvalidFrameRate(frame_rate));
        }
        self.frame_rate = frame_rate;
        Ok(self)
    }

    pub fn with_size_limit(mut self, size_limit: u64) -> Self {
        self.size_limit = size_limit;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows: Vec<ReportRow>,
    pub report_path: PathBuf,
    pub frames_processed: usize,
    pub files_compressed: usize,
    pub failed_sequences: Vec<String>,
}

/// Run every stage for `input` and write the report into `layout`.
///
/// Stages communicate only through the filesystem under `layout.root`; the
/// report rows are threaded through as return values.
pub fn run(
    input: &Path,
    layout: &OutputLayout,
    options: &PipelineOptions,
    quantizer: &dyn Quantizer,
    encoder: &dyn Encoder,
) -> Result<RunSummary> {
    let start_time = Instant::now();
    let input = validate_input_dir(input)?;
    let canvas = options.size_class.canvas();

    crate::info!("🚀 Starting APNG generation...");
    crate::info!("📁 Input: {:?}", input);
    crate::info!("📁 Output: {:?}", layout.root);
    crate::info!("📐 Size class: {} ({})", options.size_class, canvas);

    layout.create()?;

    let sequences = discover_sequences(&input)?;
    let frame_total: usize = sequences.iter().map(|s| s.frame_count()).sum();
    crate::info!(
        "📊 Found {} sequences with {} frames",
        sequences.len(),
        frame_total
    );

    let (normalized, frame_summary) = normalize_sequences(&sequences, &layout.temp_dir, canvas)?;

    let compression = compress_staging_tree(&layout.temp_dir, quantizer, options.quality)?;
    if !compression.failed.is_empty() {
        crate::warn!(
            "{} files kept their uncompressed content",
            compression.failed.len()
        );
    }

    let settings = AggregateSettings {
        frame_rate: options.frame_rate,
        plays: LOOP_FOREVER,
        size_limit: options.size_limit,
    };
    let aggregated = aggregate_sequences(&normalized, layout, encoder, &settings)?;

    write_report(&layout.report_path, &aggregated.rows)?;

    let before: u64 = aggregated.rows.iter().map(|r| r.original_combined_size).sum();
    let after: u64 = aggregated.rows.iter().map(|r| r.compressed_combined_size).sum();
    let over_limit = aggregated
        .rows
        .iter()
        .filter(|r| r.is_encoded() && !r.meets_limit)
        .count();

    crate::info!("\n📊 Run Summary:");
    crate::info!(
        "  🖼️  Frames processed: {}/{}",
        frame_summary.processed,
        frame_summary.total
    );
    crate::info!("  🗜️  Files compressed: {}/{}", compression.processed, compression.total);
    crate::info!(
        "  📦 Staged size: {} -> {} ({:.1}% smaller)",
        format_file_size(before),
        format_file_size(after),
        calculate_compression_ratio(before, after)
    );
    crate::info!(
        "  🎞️  Sequences encoded: {}/{}",
        aggregated.encoded(),
        aggregated.rows.len()
    );
    if over_limit > 0 {
        crate::info!("  ⚠️  Over size limit: {}", over_limit);
    }
    if !aggregated.failed.is_empty() {
        crate::info!("  ❌ Failed sequences: {}", aggregated.failed.join(", "));
    }
    crate::info!("  ⏱️  Total time: {:.2?}", start_time.elapsed());
    crate::info!("📋 Report generated: {}", layout.report_path.display());

    Ok(RunSummary {
        rows: aggregated.rows,
        report_path: layout.report_path.clone(),
        frames_processed: frame_summary.processed,
        files_compressed: compression.processed,
        failed_sequences: aggregated.failed,
    })
}
