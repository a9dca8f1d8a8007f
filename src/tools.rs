//! External collaborators: the lossy PNG quantizer and the APNG encoder.
//!
//! Both are modelled as traits so the pipeline can run against fakes in
//! tests. The production implementations shell out to `pngquant` and
//! `ffmpeg`, which must be resolvable on `PATH`.

use crate::constants::{
    DEFAULT_QUALITY_MAX, DEFAULT_QUALITY_MIN, ENCODER_PIXEL_FORMAT, FFMPEG_BINARY,
    FRAME_INDEX_WIDTH, MAX_QUALITY, PNGQUANT_BINARY, QUANTIZER_SPEED,
};
use crate::error::{PipelineError, ToolError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Quality bounds handed to the quantizer, rendered as `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRange {
    pub min: u8,
    pub max: u8,
}

impl QualityRange {
    pub fn new(min: u8, max: u8) -> Result<Self, PipelineError> {
        if min > max || max > MAX_QUALITY {
            return Err(PipelineError::InvalidQualityRange(min, max));
        }
        Ok(Self { min, max })
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_QUALITY_MIN,
            max: DEFAULT_QUALITY_MAX,
        }
    }
}

impl fmt::Display for QualityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Lossy PNG recompression, overwriting the file in place.
pub trait Quantizer: Sync {
    fn name(&self) -> &str;

    fn compress(&self, path: &Path, quality: QualityRange) -> Result<(), ToolError>;
}

/// Parameters for encoding one sequence into an animated PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    pub frame_rate: u32,
    /// Number of plays, 0 loops forever
    pub plays: u32,
    /// Prefix for the numbered frame names the encoder reads
    pub frame_prefix: String,
    pub output: PathBuf,
}

/// Turns an ordered list of frames into a single animated PNG.
pub trait Encoder {
    fn name(&self) -> &str;

    /// Encode `frames` in order and return the artifact path.
    fn encode(&self, frames: &[PathBuf], params: &EncodeParams) -> Result<PathBuf, ToolError>;
}

pub fn is_tool_on_path(binary: &str, version_arg: &str) -> bool {
    Command::new(binary)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_tool_available(binary: &str, version_arg: &str) -> Result<(), ToolError> {
    if is_tool_on_path(binary, version_arg) {
        Ok(())
    } else {
        Err(ToolError::NotFound {
            tool: binary.to_string(),
        })
    }
}

fn run_tool(tool: &str, cmd: &mut Command) -> Result<Output, ToolError> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ToolError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

/// `pngquant` invoked once per file with `--force --output <file>`.
#[derive(Debug, Clone)]
pub struct Pngquant {
    pub binary: String,
    pub speed: u8,
}

impl Default for Pngquant {
    fn default() -> Self {
        Self {
            binary: PNGQUANT_BINARY.to_string(),
            speed: QUANTIZER_SPEED,
        }
    }
}

impl Pngquant {
    pub fn ensure_available(&self) -> Result<(), ToolError> {
        ensure_tool_available(&self.binary, "--version")
    }
}

impl Quantizer for Pngquant {
    fn name(&self) -> &str {
        &self.binary
    }

    fn compress(&self, path: &Path, quality: QualityRange) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--force",
            "--quality",
            &quality.to_string(),
            "--speed",
            &self.speed.to_string(),
            "--output",
        ])
        .arg(path)
        .arg("--")
        .arg(path);

        run_tool(&self.binary, &mut cmd).map(|_| ())
    }
}

/// File name of the frame at `index` for the encoder's numbered pattern.
pub fn numbered_frame_name(prefix: &str, index: usize) -> String {
    format!("{}_{:0width$}.png", prefix, index, width = FRAME_INDEX_WIDTH)
}

/// printf-style input pattern matching [`numbered_frame_name`].
pub fn encoder_input_pattern(prefix: &str) -> String {
    format!(
        "{}_%0{}d.png",
        prefix.replace('%', "%%"),
        FRAME_INDEX_WIDTH
    )
}

/// Full `-i` argument for frames renamed inside `dir`.
///
/// The encoder reads the whole path as a printf pattern, so `%` in the
/// directory is doubled as well. Non-UTF-8 directories are passed through.
pub fn encoder_input_path(dir: &Path, prefix: &str) -> PathBuf {
    let dir = match dir.to_str() {
        Some(text) => PathBuf::from(text.replace('%', "%%")),
        None => dir.to_path_buf(),
    };
    dir.join(encoder_input_pattern(prefix))
}

/// Rename `frames` in place to `<prefix>_00000.png`, `<prefix>_00001.png`, ...
/// following their order.
///
/// Goes through temporary names first so an existing file that already
/// carries a target name is never overwritten.
pub fn rename_numbered(frames: &[PathBuf], prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        let dir = frame.parent().unwrap_or_else(|| Path::new(""));
        let temp = dir.join(format!("{}.renaming", numbered_frame_name(prefix, index)));
        fs::rename(frame, &temp)?;
        staged.push(temp);
    }

    let mut renamed = Vec::with_capacity(staged.len());
    for (index, temp) in staged.into_iter().enumerate() {
        let dir = temp.parent().unwrap_or_else(|| Path::new(""));
        let target = dir.join(numbered_frame_name(prefix, index));
        fs::rename(&temp, &target)?;
        renamed.push(target);
    }

    Ok(renamed)
}

/// `ffmpeg` APNG encoder reading a numbered frame pattern.
#[derive(Debug, Clone)]
pub struct FfmpegApng {
    pub binary: String,
}

impl Default for FfmpegApng {
    fn default() -> Self {
        Self {
            binary: FFMPEG_BINARY.to_string(),
        }
    }
}

impl FfmpegApng {
    pub fn ensure_available(&self) -> Result<(), ToolError> {
        ensure_tool_available(&self.binary, "-version")
    }
}

impl Encoder for FfmpegApng {
    fn name(&self) -> &str {
        &self.binary
    }

    fn encode(&self, frames: &[PathBuf], params: &EncodeParams) -> Result<PathBuf, ToolError> {
        let first = frames.first().ok_or(ToolError::EmptySequence)?;
        let dir = first.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

        rename_numbered(frames, &params.frame_prefix).map_err(|source| ToolError::Io {
            tool: self.binary.clone(),
            source,
        })?;

        let pattern = encoder_input_path(&dir, &params.frame_prefix);

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-y", "-loglevel", "error", "-r", &params.frame_rate.to_string(), "-i"])
            .arg(&pattern)
            .args([
                "-plays",
                &params.plays.to_string(),
                "-vf",
                &format!("format={}", ENCODER_PIXEL_FORMAT),
                "-f",
                "apng",
            ])
            .arg(&params.output);

        run_tool(&self.binary, &mut cmd)?;

        if !params.output.is_file() {
            return Err(ToolError::MissingOutput {
                tool: self.binary.clone(),
                path: params.output.clone(),
            });
        }

        Ok(params.output.clone())
    }
}
