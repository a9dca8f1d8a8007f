//! Helpers shared by the pipeline stages.

use crate::constants::{PNG_EXTENSION, PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE};
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

/// Check if a path names a PNG file by extension (case-insensitive)
pub fn is_png_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PNG_EXTENSION))
        .unwrap_or(false)
}

/// Sum of the on-disk sizes of the given files
pub fn total_file_size<P: AsRef<Path>>(paths: &[P]) -> Result<u64> {
    let mut total = 0u64;
    for path in paths {
        total += fs::metadata(path.as_ref())?.len();
    }
    Ok(total)
}

/// Create a counting progress bar with consistent styling.
///
/// The bar is hidden in quiet mode so library callers and tests stay silent.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_BAR_CHARS);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 KB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Size reduction as a percentage (positive means the files shrank)
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_is_png_file() {
        assert!(is_png_file(Path::new("001.png")));
        assert!(is_png_file(Path::new("walk/001.PNG")));
        assert!(is_png_file(Path::new("frame.Png")));

        assert!(!is_png_file(Path::new("notes.txt")));
        assert!(!is_png_file(Path::new("photo.jpg")));
        assert!(!is_png_file(Path::new("png")));
        assert!(!is_png_file(Path::new("frame.png.bak")));
    }

    #[test]
    fn test_total_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.png");
        File::create(&a).unwrap().write_all(&[0u8; 100]).unwrap();
        File::create(&b).unwrap().write_all(&[0u8; 28]).unwrap();

        assert_eq!(total_file_size(&[a, b]).unwrap(), 128);
        assert_eq!(total_file_size::<&Path>(&[]).unwrap(), 0);
    }

    #[test]
    fn test_total_file_size_missing_file() {
        let result = total_file_size(&[Path::new("/nonexistent/frame.png")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(512_000), "500.0 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert_eq!(calculate_compression_ratio(1000, 800), 20.0);
        assert_eq!(calculate_compression_ratio(1000, 1200), -20.0);
        assert_eq!(calculate_compression_ratio(0, 500), 0.0);
    }
}
