use crate::constants::{LARGE_CANVAS, REGULAR_CANVAS, SMALL_CANVAS};
use crate::error::{PipelineError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Output size class, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SizeClass {
    Small,
    Regular,
    Large,
}

impl SizeClass {
    pub fn canvas(&self) -> CanvasSize {
        match self {
            SizeClass::Small => CanvasSize::square(SMALL_CANVAS),
            SizeClass::Regular => CanvasSize::square(REGULAR_CANVAS),
            SizeClass::Large => CanvasSize::square(LARGE_CANVAS),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Regular => "regular",
            SizeClass::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeClass {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "regular" => Ok(SizeClass::Regular),
            "large" => Ok(SizeClass::Large),
            _ => Err(format!(
                "unknown size class '{}', expected small, regular or large",
                s
            )),
        }
    }
}

/// Fixed output canvas every normalized frame conforms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Size a frame takes on the canvas.
///
/// Frames strictly smaller than the canvas on both axes keep their size.
/// Anything else is scaled so its longer side matches the canvas, with the
/// other side derived from the same ratio and floored. A derived side never
/// drops below one pixel.
pub fn fit_dimensions(width: u32, height: u32, canvas: CanvasSize) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    if width < canvas.width && height < canvas.height {
        return (width, height);
    }

    if width >= height {
        let new_width = canvas.width.min(width);
        let new_height = (u64::from(height) * u64::from(new_width) / u64::from(width)) as u32;
        (new_width, new_height.max(1))
    } else {
        let new_height = canvas.height.min(height);
        let new_width = (u64::from(width) * u64::from(new_height) / u64::from(height)) as u32;
        (new_width.max(1), new_height)
    }
}

/// Top-left position of a `scaled` frame centered on `canvas`.
///
/// Odd leftovers put the extra pixel of padding on the bottom/right.
pub fn centering_offset(canvas: CanvasSize, scaled: (u32, u32)) -> (u32, u32) {
    (
        canvas.width.saturating_sub(scaled.0) / 2,
        canvas.height.saturating_sub(scaled.1) / 2,
    )
}

/// Fit `frame` into `canvas` and center it on a fully transparent background.
///
/// Frames without an alpha channel are treated as opaque.
pub fn compose(frame: &DynamicImage, canvas: CanvasSize) -> RgbaImage {
    let (width, height) = frame.dimensions();
    let (new_width, new_height) = fit_dimensions(width, height, canvas);

    let rgba = frame.to_rgba8();
    let fitted = if (new_width, new_height) == (width, height) {
        rgba
    } else {
        imageops::resize(&rgba, new_width, new_height, FilterType::Lanczos3)
    };

    // Copying onto alpha 0 is identical to source-over compositing.
    let mut output = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([0, 0, 0, 0]));
    let (x, y) = centering_offset(canvas, (new_width, new_height));
    imageops::replace(&mut output, &fitted, i64::from(x), i64::from(y));
    output
}

/// Decode one frame from disk. Any failure here is fatal for the run.
pub fn load_frame(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(PipelineError::FileNotFound(path.to_path_buf()));
    }

    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| PipelineError::ImageProcessing {
            path: path.to_path_buf(),
            source,
        })
}

/// Load, compose and write a single frame as PNG. Returns the written size.
pub fn normalize_frame(input: &Path, output: &Path, canvas: CanvasSize) -> Result<u64> {
    let frame = load_frame(input)?;
    let normalized = compose(&frame, canvas);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .map_err(|_| PipelineError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }

    normalized
        .save_with_format(output, ImageFormat::Png)
        .map_err(|source| PipelineError::ImageProcessing {
            path: output.to_path_buf(),
            source,
        })?;

    Ok(fs::metadata(output)?.len())
}
