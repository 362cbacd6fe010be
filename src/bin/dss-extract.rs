use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use dss_quality::{logging, QualityExtractor, SessionLayout};

/// Tabulate DeepSkyStacker frame quality against capture time.
///
/// Reads `<SESSION>/light/*.CR2` with their `.Info.txt` reports and writes
/// `<SESSION>/dss_plot/dss_quality_data.csv`.
#[derive(Parser, Debug)]
#[command(name = "dss-extract", version, about, long_about = None)]
struct Args {
    /// Session folder containing the lights folder
    #[arg(default_value = ".")]
    session: PathBuf,

    /// Raw frame extension
    #[arg(long, env = "DSS_RAW_EXT", default_value = "CR2")]
    raw_ext: String,

    /// Suffix of the DSS report next to each raw frame
    #[arg(long, default_value = "Info.txt")]
    report_suffix: String,

    /// Lights folder name inside the session
    #[arg(long, env = "DSS_LIGHTS_DIR", default_value = "light")]
    lights_dir: String,

    /// Output folder name inside the session
    #[arg(long, env = "DSS_OUTPUT_DIR", default_value = "dss_plot")]
    output_dir: String,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Show per-frame details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let layout = SessionLayout::new(&args.session)
        .with_lights_dir(args.lights_dir)
        .with_output_dir(args.output_dir);

    let path = QualityExtractor::new()
        .with_raw_extension(args.raw_ext)
        .with_report_suffix(args.report_suffix)
        .with_progress(!args.no_progress)
        .extract_session(&layout)?;

    println!("{}", path.display());
    Ok(())
}
