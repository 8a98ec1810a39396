use clap::Parser;
use std::path::PathBuf;

use omni_core::models::QualityProfile;

/// Convert and merge chaptered 360 camera recordings
#[derive(Parser, Debug)]
#[command(name = "omnistitch", author, version, about, long_about = None)]
pub struct Args {
    /// Directory to process
    #[arg(value_name = "INPUT_DIR", default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory for converted and merged files, relative to INPUT_DIR
    /// (default: paths.output_folder from the config, "Converted")
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Accept every offered action without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Quality setting for conversion: lb, sq, hq, hqx or 444
    #[arg(short = 'q', long = "quality", value_name = "CODE", value_parser = parse_quality)]
    pub quality: Option<QualityProfile>,

    /// Settings file (default: platform config dir)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show tool output and debug messages
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

fn parse_quality(code: &str) -> Result<QualityProfile, String> {
    code.parse()
}
