use apng_forge::cli::Args;
use apng_forge::error::Result;
use apng_forge::layout::OutputLayout;
use apng_forge::pipeline::{run, PipelineOptions};
use apng_forge::tools::{FfmpegApng, Pngquant};
use apng_forge::validation::validate_input_dir;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            apng_forge::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<()> {
    validate_input_dir(&args.input_folder)?;

    let quantizer = Pngquant::default();
    let encoder = FfmpegApng::default();
    quantizer.ensure_available()?;
    encoder.ensure_available()?;

    let layout = OutputLayout::timestamped(Path::new("."), args.size);
    let options = PipelineOptions::new(args.size);

    run(&args.input_folder, &layout, &options, &quantizer, &encoder)?;
    Ok(())
}
