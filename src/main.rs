use bmp_filters::{args, config, output, process};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmp-filters")]
#[command(about = "Apply a chain of filters to a 24-bit BMP image")]
#[command(long_about = "\
Apply a chain of filters to a 24-bit BMP image

Filters run left to right. Each filter name starts with '-' and is followed
by its parameters:

  -crop <width> <height>                  Keep the top-left region
  -gs                                     Grayscale
  -neg                                    Negative
  -sharp                                  Sharpen
  -edge <threshold>                       Edge detection, threshold in [0, 1]
  -blur <sigma>                           Gaussian blur
  -drop <strength> [center_x center_y]    Radial drop warp, strength >= 2

Unknown filter names, including a leading word without '-', are reported
and skipped.

Example:
  bmp-filters photo.bmp out.bmp -crop 800 600 -gs -blur 1.5")]
#[command(version)]
struct Cli {
    /// TOML config file (processing, pipeline and output settings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Only print errors and unknown-filter warnings
    #[arg(long, short)]
    quiet: bool,

    /// Source image (uncompressed 24-bit BMP)
    input: PathBuf,

    /// Destination image
    output: PathBuf,

    /// Filter chain, e.g. `-crop 100 80 -neg`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    filters: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), process::ProcessError> {
    let config = config::load_config(cli.config.as_deref())?;
    init_thread_pool(&config.processing);

    let specs = args::parse_filters(&cli.filters);
    let quiet = cli.quiet;
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_pipeline_event(&event, quiet);
        }
    });
    let result = process::process(&cli.input, &cli.output, &specs, &config, Some(tx));
    // The sender was moved into process and is gone, so the printer drains and exits.
    printer.join().ok();
    let report = result?;

    if let Some(path) = &cli.report {
        process::write_report(&report, path)?;
    }
    if !cli.quiet {
        output::print_summary(&report);
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
