#[macro_use]
pub mod logger;

pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod processing;
pub mod quantize;
pub mod report;
pub mod tools;
pub mod utils;
pub mod validation;

pub use aggregate::{aggregate_sequence, aggregate_sequences, AggregateSettings, AggregateSummary};
pub use batch::{normalize_sequences, FrameSummary, NormalizedSequence};
pub use discovery::{discover_sequences, Sequence};
pub use error::{PipelineError, Result, ToolError};
pub use layout::OutputLayout;
pub use pipeline::{run, PipelineOptions, RunSummary};
pub use processing::{centering_offset, compose, fit_dimensions, CanvasSize, SizeClass};
pub use quantize::{compress_staging_tree, CompressionSummary};
pub use report::{write_report, ReportRow};
pub use tools::{EncodeParams, Encoder, FfmpegApng, Pngquant, QualityRange, Quantizer};
