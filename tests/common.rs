#![allow(dead_code)]

use apng_forge::tools::rename_numbered;
use apng_forge::{EncodeParams, Encoder, QualityRange, Quantizer, ToolError};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn write_rgb_frame(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 251) as u8, (y % 251) as u8, 128])
    })
    .save(path)
    .unwrap();
}

pub fn write_rgba_frame(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(width, height, Rgba([200, 50, 50, 180]))
        .save(path)
        .unwrap();
}

pub fn write_text(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Leaves files untouched and records every call.
#[derive(Default)]
pub struct RecordingQuantizer {
    pub calls: Mutex<Vec<(PathBuf, QualityRange)>>,
}

impl Quantizer for RecordingQuantizer {
    fn name(&self) -> &str {
        "recording-quantizer"
    }

    fn compress(&self, path: &Path, quality: QualityRange) -> Result<(), ToolError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), quality));
        Ok(())
    }
}

/// Truncates every file it touches to a single byte.
pub struct ShrinkingQuantizer;

impl Quantizer for ShrinkingQuantizer {
    fn name(&self) -> &str {
        "shrinking-quantizer"
    }

    fn compress(&self, path: &Path, _quality: QualityRange) -> Result<(), ToolError> {
        fs::write(path, [0u8]).map_err(|source| ToolError::Io {
            tool: self.name().to_string(),
            source,
        })
    }
}

/// Follows the ffmpeg renaming contract, then concatenates the frames into
/// the artifact, optionally padded to a fixed size.
#[derive(Default)]
pub struct ConcatEncoder {
    pub pad_to: Option<usize>,
}

impl Encoder for ConcatEncoder {
    fn name(&self) -> &str {
        "concat-encoder"
    }

    fn encode(&self, frames: &[PathBuf], params: &EncodeParams) -> Result<PathBuf, ToolError> {
        if frames.is_empty() {
            return Err(ToolError::EmptySequence);
        }
        let io_err = |source| ToolError::Io {
            tool: "concat-encoder".to_string(),
            source,
        };

        let renamed = rename_numbered(frames, &params.frame_prefix).map_err(io_err)?;
        let mut bytes = Vec::new();
        for frame in &renamed {
            bytes.extend(fs::read(frame).map_err(io_err)?);
        }
        if let Some(size) = self.pad_to {
            bytes.resize(size, 0);
        }
        fs::write(&params.output, bytes).map_err(io_err)?;
        Ok(params.output.clone())
    }
}

/// Fails for sequences whose name contains `broken`.
pub struct SelectiveEncoder;

impl Encoder for SelectiveEncoder {
    fn name(&self) -> &str {
        "selective-encoder"
    }

    fn encode(&self, frames: &[PathBuf], params: &EncodeParams) -> Result<PathBuf, ToolError> {
        if params.frame_prefix.contains("broken") {
            return Err(ToolError::MissingOutput {
                tool: self.name().to_string(),
                path: params.output.clone(),
            });
        }
        ConcatEncoder::default().encode(frames, params)
    }
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
