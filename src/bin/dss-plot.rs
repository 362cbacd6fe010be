use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use dss_quality::{logging, plot, PlotConfig, QualityTable, SessionLayout};
use tracing::info;

/// Plot rolling-average DSS quality, star count and sky background over time.
///
/// Reads `<SESSION>/dss_plot/dss_quality_data.csv` (written by `dss-extract`)
/// and saves `<SESSION>/dss_plot/dss_plot.jpg`.
#[derive(Parser, Debug)]
#[command(name = "dss-plot", version, about, long_about = None)]
struct Args {
    /// Session folder
    #[arg(default_value = ".")]
    session: PathBuf,

    /// Output folder name inside the session
    #[arg(long, env = "DSS_OUTPUT_DIR", default_value = "dss_plot")]
    output_dir: String,

    /// Plot file name (.jpg or .png)
    #[arg(long, default_value = "dss_plot.jpg")]
    plot_name: String,

    /// Rolling-mean window in frames
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    window: u32,

    /// Label every Nth frame on the time axis
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    label_every: u32,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 900)]
    height: u32,

    /// JPEG quality 1-100
    #[arg(long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Only plot the rolling quality
    #[arg(long)]
    quality_only: bool,

    /// Open the plot in the system image viewer
    #[arg(long)]
    show: bool,

    /// Show detailed information
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
        .with_output_dir(args.output_dir)
        .with_plot_name(args.plot_name);

    let config = PlotConfig::default()
        .with_window(args.window as usize)
        .with_label_stride(args.label_every as usize)
        .with_size(args.width, args.height)
        .with_quality(args.quality);

    let table = QualityTable::read_csv(&layout.table_path())?;
    let plot_path = layout.plot_path();

    if args.quality_only {
        plot::render_quality(&table, &plot_path, &config)?;
    } else {
        plot::render_panels(&table, &plot_path, &config)?;
    }

    if args.show {
        info!("Opening {}", plot_path.display());
        opener::open(&plot_path)
            .with_context(|| format!("Failed to open {}", plot_path.display()))?;
    }

    println!("{}", plot_path.display());
    Ok(())
}
