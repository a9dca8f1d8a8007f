use crate::processing::SizeClass;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "apng-forge",
    about = "Normalize PNG frame sequences and build size-checked animated PNGs",
    long_about = "apng-forge walks an input folder, treats every directory that directly holds PNG frames \
                  as one animation, fits each frame onto a fixed transparent canvas, compresses the frames \
                  with pngquant, encodes one animated PNG per sequence with ffmpeg and writes a CSV report \
                  checking every animation against the 500 KB budget. Both pngquant and ffmpeg must be on PATH.",
    version,
    after_help = "EXAMPLES:\n  \
    apng-forge ./sprites regular\n  \
    apng-forge ~/exports/characters large\n\n\
    OUTPUT:\n  \
    <YYYYMMDD_HHMMSS>_<size>/{temp,static,animated}/ and report.csv in the current directory"
)]
pub struct Args {
    #[arg(help = "Input folder containing image sequences")]
    pub input_folder: PathBuf,

    #[arg(
        value_enum,
        help = "Output size: small (300x300), regular (408x408) or large (618x618)"
    )]
    pub size: SizeClass,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_positional_arguments() {
        let args = Args::try_parse_from(["apng-forge", "./frames", "regular"]).unwrap();
        assert_eq!(args.input_folder, PathBuf::from("./frames"));
        assert_eq!(args.size, SizeClass::Regular);
    }

    #[test]
    fn test_rejects_unknown_size() {
        assert!(Args::try_parse_from(["apng-forge", "./frames", "huge"]).is_err());
        assert!(Args::try_parse_from(["apng-forge", "./frames"]).is_err());
    }
}
