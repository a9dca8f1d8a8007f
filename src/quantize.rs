use crate::error::Result;
use crate::tools::{QualityRange, Quantizer};
use crate::utils::{create_progress_bar, is_png_file};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionSummary {
    pub processed: usize,
    pub total: usize,
    /// Files the quantizer rejected; they keep their normalized content
    pub failed: Vec<PathBuf>,
}

/// Every PNG file under `root`, in sorted walk order.
pub fn collect_png_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_png_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Run the quantizer over every PNG in the staging tree, in place.
///
/// A failing file is reported and skipped; the stage itself only fails when
/// the tree cannot be walked.
pub fn compress_staging_tree(
    staging_root: &Path,
    quantizer: &dyn Quantizer,
    quality: QualityRange,
) -> Result<CompressionSummary> {
    let files = collect_png_files(staging_root)?;
    let total = files.len();

    crate::info!(
        "🗜️  Found {} PNG files in the staging tree. Compressing with {} (quality {})...",
        total,
        quantizer.name(),
        quality
    );

    let progress = create_progress_bar(total as u64, "Compressing");

    let outcomes: Vec<Option<PathBuf>> = files
        .par_iter()
        .map(|file| {
            let outcome = match quantizer.compress(file, quality) {
                Ok(()) => {
                    crate::verbose!("Compressed {:?}", file);
                    None
                }
                Err(e) => {
                    progress.suspend(|| {
                        crate::warn!("Error processing file {:?}: {}. Skipping this file.", file, e)
                    });
                    Some(file.clone())
                }
            };
            progress.inc(1);
            outcome
        })
        .collect();

    progress.finish_and_clear();

    let failed: Vec<PathBuf> = outcomes.into_iter().flatten().collect();
    let summary = CompressionSummary {
        processed: total - failed.len(),
        total,
        failed,
    };

    crate::info!(
        "✅ Compression complete. {}/{} files processed.",
        summary.processed,
        summary.total
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use std::fs::{self, File};
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Appends a marker byte to each file; fails on names containing "bad".
    struct MarkingQuantizer {
        seen: Mutex<Vec<PathBuf>>,
    }

    impl Quantizer for MarkingQuantizer {
        fn name(&self) -> &str {
            "marking"
        }

        fn compress(
            &self,
            path: &Path,
            _quality: QualityRange,
        ) -> std::result::Result<(), ToolError> {
            self.seen.lock().unwrap().push(path.to_path_buf());
            if path.to_string_lossy().contains("bad") {
                return Err(ToolError::EmptySequence);
            }
            fs::write(path, b"q").map_err(|source| ToolError::Io {
                tool: "marking".to_string(),
                source,
            })
        }
    }

    fn write(path: &Path, body: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(path).unwrap().write_all(body).unwrap();
    }

    #[test]
    fn test_collect_png_files_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir.path().join("b/2.png"), b"x");
        write(&temp_dir.path().join("a/1.png"), b"x");
        write(&temp_dir.path().join("a/readme.txt"), b"x");

        let files = collect_png_files(temp_dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a/1.png"));
        assert!(files[1].ends_with("b/2.png"));
    }

    #[test]
    fn test_compress_staging_tree_tolerates_failures() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir.path().join("walk/001.png"), b"normalized");
        write(&temp_dir.path().join("walk/bad.png"), b"normalized");
        write(&temp_dir.path().join("run/001.png"), b"normalized");

        let quantizer = MarkingQuantizer {
            seen: Mutex::new(Vec::new()),
        };
        let summary =
            compress_staging_tree(temp_dir.path(), &quantizer, QualityRange::default()).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].ends_with("walk/bad.png"));
        assert_eq!(quantizer.seen.lock().unwrap().len(), 3);

        assert_eq!(fs::read(temp_dir.path().join("walk/001.png")).unwrap(), b"q");
        assert_eq!(
            fs::read(temp_dir.path().join("walk/bad.png")).unwrap(),
            b"normalized"
        );
    }

    #[test]
    fn test_compress_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let quantizer = MarkingQuantizer {
            seen: Mutex::new(Vec::new()),
        };
        let summary =
            compress_staging_tree(temp_dir.path(), &quantizer, QualityRange::default()).unwrap();
        assert_eq!(summary, CompressionSummary::default());
    }
}
