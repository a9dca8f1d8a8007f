use crate::discovery::Sequence;
use crate::error::{PipelineError, Result};
use crate::processing::{normalize_frame, CanvasSize};
use crate::utils::{create_progress_bar, format_file_size};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A sequence whose frames have been written to the staging tree.
#[derive(Debug, Clone)]
pub struct NormalizedSequence {
    pub sequence: Sequence,
    pub staging_dir: PathBuf,
    /// Staging frame paths in playback order
    pub frames: Vec<PathBuf>,
    /// Combined size of the staged frames before quantization
    pub normalized_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub processed: usize,
    pub total: usize,
    pub input_bytes: u64,
    pub normalized_bytes: u64,
}

struct FrameJob<'a> {
    sequence_index: usize,
    input: &'a Path,
    output: PathBuf,
}

/// Staging location of a frame: the sequence's relative directory under
/// `staging_root`, keeping the original file name.
pub fn staging_path(staging_root: &Path, sequence: &Sequence, frame: &Path) -> Result<PathBuf> {
    let file_name = frame
        .file_name()
        .ok_or_else(|| PipelineError::FileNotFound(frame.to_path_buf()))?;
    Ok(staging_root.join(&sequence.relative_dir).join(file_name))
}

/// Compose every frame of every sequence onto `canvas` and write it into the
/// staging tree.
///
/// Frames are processed in parallel, results keep discovery order. The first
/// unreadable frame aborts the whole batch.
pub fn normalize_sequences(
    sequences: &[Sequence],
    staging_root: &Path,
    canvas: CanvasSize,
) -> Result<(Vec<NormalizedSequence>, FrameSummary)> {
    let start_time = Instant::now();

    let mut jobs = Vec::new();
    for (sequence_index, sequence) in sequences.iter().enumerate() {
        for frame in &sequence.frames {
            jobs.push(FrameJob {
                sequence_index,
                input: frame,
                output: staging_path(staging_root, sequence, frame)?,
            });
        }
    }

    let total = jobs.len();
    crate::info!(
        "🖼️  Normalizing {} frames from {} sequences onto a {} canvas",
        total,
        sequences.len(),
        canvas
    );

    let progress = create_progress_bar(total as u64, "Processing frames");

    let sizes: Vec<(u64, u64)> = jobs
        .par_iter()
        .map(|job| -> Result<(u64, u64)> {
            let input_size = fs::metadata(job.input)?.len();
            let output_size = normalize_frame(job.input, &job.output, canvas)?;
            crate::verbose!("Normalized {:?} -> {:?}", job.input, job.output);
            progress.inc(1);
            Ok((input_size, output_size))
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish_and_clear();

    let mut normalized: Vec<NormalizedSequence> = sequences
        .iter()
        .map(|sequence| NormalizedSequence {
            sequence: sequence.clone(),
            staging_dir: staging_root.join(&sequence.relative_dir),
            frames: Vec::with_capacity(sequence.frame_count()),
            normalized_bytes: 0,
        })
        .collect();

    let mut summary = FrameSummary {
        processed: 0,
        total,
        input_bytes: 0,
        normalized_bytes: 0,
    };

    for (job, (input_size, output_size)) in jobs.into_iter().zip(sizes) {
        let entry = &mut normalized[job.sequence_index];
        entry.frames.push(job.output);
        entry.normalized_bytes += output_size;

        summary.processed += 1;
        summary.input_bytes += input_size;
        summary.normalized_bytes += output_size;
    }

    crate::info!(
        "✅ Processing complete: {}/{} frames ({} -> {}) in {:.2?}",
        summary.processed,
        summary.total,
        format_file_size(summary.input_bytes),
        format_file_size(summary.normalized_bytes),
        start_time.elapsed()
    );

    Ok((normalized, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_sequences;
    use image::{GenericImageView, Rgb, RgbImage};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_frame(path: &Path, width: u32, height: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(width, height, Rgb([10, 20, 30]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_staging_path_mirrors_relative_dir() {
        let sequence = Sequence {
            relative_dir: PathBuf::from("hero/walk"),
            name: "hero__walk".to_string(),
            frames: vec![PathBuf::from("/in/hero/walk/001.png")],
        };
        let path = staging_path(Path::new("/out/temp"), &sequence, &sequence.frames[0]).unwrap();
        assert_eq!(path, PathBuf::from("/out/temp/hero/walk/001.png"));
    }

    #[test]
    fn test_normalize_sequences_writes_staging_tree() {
        let input = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write_frame(&input.path().join("walk/001.png"), 800, 600);
        write_frame(&input.path().join("walk/002.png"), 800, 600);
        write_frame(&input.path().join("idle/a.png"), 50, 50);
        File::create(input.path().join("walk/notes.txt"))
            .unwrap()
            .write_all(b"ignored")
            .unwrap();

        let sequences = discover_sequences(input.path()).unwrap();
        let (normalized, summary) =
            normalize_sequences(&sequences, staging.path(), CanvasSize::square(408)).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.processed, 3);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].sequence.name, "idle");
        assert_eq!(normalized[1].sequence.name, "walk");
        assert_eq!(normalized[1].frames.len(), 2);
        assert!(normalized[1].frames[0].ends_with("walk/001.png"));
        assert!(normalized[1].frames[1].ends_with("walk/002.png"));
        assert!(!staging.path().join("walk/notes.txt").exists());

        let staged_total: u64 = normalized.iter().map(|n| n.normalized_bytes).sum();
        assert_eq!(staged_total, summary.normalized_bytes);

        for seq in &normalized {
            for frame in &seq.frames {
                assert_eq!(image::open(frame).unwrap().dimensions(), (408, 408));
            }
        }
    }

    #[test]
    fn test_normalize_sequences_aborts_on_bad_frame() {
        let input = TempDir::new().unwrap();
        let staging = TempDir::new().unwrap();
        write_frame(&input.path().join("walk/001.png"), 20, 20);
        File::create(input.path().join("walk/002.png"))
            .unwrap()
            .write_all(b"corrupt")
            .unwrap();

        let sequences = discover_sequences(input.path()).unwrap();
        let result = normalize_sequences(&sequences, staging.path(), CanvasSize::square(300));

        assert!(matches!(
            result,
            Err(PipelineError::ImageProcessing { .. })
        ));
    }
}
