/// Canvas edge lengths for each size class (all canvases are square)
pub const SMALL_CANVAS: u32 = 300;
pub const REGULAR_CANVAS: u32 = 408;
pub const LARGE_CANVAS: u32 = 618;

pub const DEFAULT_QUALITY_MIN: u8 = 15;
pub const DEFAULT_QUALITY_MAX: u8 = 30;
pub const MAX_QUALITY: u8 = 100;

/// pngquant speed/effort, 1 is the slowest and most thorough
pub const QUANTIZER_SPEED: u8 = 1;

pub const DEFAULT_FRAME_RATE: u32 = 8;
/// APNG play count, 0 loops forever
pub const LOOP_FOREVER: u32 = 0;
pub const ENCODER_PIXEL_FORMAT: &str = "rgba";

pub const SIZE_LIMIT_KIB: u64 = 500;
pub const SIZE_LIMIT_BYTES: u64 = SIZE_LIMIT_KIB * 1024;

pub const FRAME_INDEX_WIDTH: usize = 5;
pub const SEQUENCE_NAME_SEPARATOR: &str = "__";

pub const PNG_EXTENSION: &str = "png";

pub const PNGQUANT_BINARY: &str = "pngquant";
pub const FFMPEG_BINARY: &str = "ffmpeg";

pub const TEMP_DIR_NAME: &str = "temp";
pub const STATIC_DIR_NAME: &str = "static";
pub const ANIMATED_DIR_NAME: &str = "animated";
pub const REPORT_FILE_NAME: &str = "report.csv";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const REPORT_HEADER: [&str; 6] = [
    "name",
    "original_combined_size",
    "compressed_combined_size",
    "apng_size",
    "meets_500kb_limit",
    "additional_opt_req",
];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
pub const VERBOSE_PREFIX: &str = "🔍";
