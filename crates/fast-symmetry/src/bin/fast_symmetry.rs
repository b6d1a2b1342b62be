//! fast-symmetry CLI: detect bilateral symmetry axes in an edge image.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand};
use fast_symmetry::detect::{accumulator_to_gray, edge_view, mask_to_gray};
use fast_symmetry::{SymmetryConfig, SymmetryDetector, SymmetryResults};
use image::ImageReader;
use log::{info, LevelFilter};
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "fast-symmetry")]
#[command(about = "Detect bilateral symmetry axes in binary edge images")]
#[command(version)]
struct Cli {
    /// Log level for stderr output (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vote an edge image and print the strongest symmetry axes.
    Detect {
        /// Edge image; any non-zero pixel is an edge.
        #[arg(long)]
        image: PathBuf,

        /// JSON detector configuration. Missing fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the number of axes to extract.
        #[arg(long)]
        num_peaks: Option<usize>,

        /// Write a JSON report here.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write the pre-suppression accumulator as a grayscale image.
        #[arg(long)]
        accumulator: Option<PathBuf>,

        /// Write the suppression mask as a grayscale image.
        #[arg(long)]
        mask: Option<PathBuf>,
    },

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Serialize)]
struct LineReport {
    r: f32,
    theta_deg: f32,
    raw_r: f32,
    raw_theta_deg: f32,
    r_index_raw: usize,
    theta_index_raw: usize,
    votes: u32,
}

#[derive(Debug, Serialize)]
struct DetectReport {
    image_path: String,
    width: usize,
    height: usize,
    r_bins: usize,
    theta_bins: usize,
    edge_points: usize,
    votes: u64,
    config: SymmetryConfig,
    lines: Vec<LineReport>,
}

struct DetectArgs {
    image: PathBuf,
    config: Option<PathBuf>,
    num_peaks: Option<usize>,
    out: Option<PathBuf>,
    accumulator: Option<PathBuf>,
    mask: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(parse_level(&cli.log_level)?)?;

    match cli.command {
        Commands::Detect {
            image,
            config,
            num_peaks,
            out,
            accumulator,
            mask,
        } => run_detect(DetectArgs {
            image,
            config,
            num_peaks,
            out,
            accumulator,
            mask,
        }),
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&SymmetryConfig::default())?);
            Ok(())
        }
    }
}

fn parse_level(raw: &str) -> CliResult<LevelFilter> {
    LevelFilter::from_str(raw).map_err(|_| -> CliError {
        format!("invalid log level '{raw}' (expected off, error, warn, info, debug or trace)")
            .into()
    })
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    fast_symmetry::core::init_with_level(level).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    tracing_log::LogTracer::init_with_filter(level).map_err(|e| e.to_string())?;
    fast_symmetry::core::init_tracing(false, level);
    Ok(())
}

fn load_config(path: Option<&Path>) -> CliResult<SymmetryConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| -> CliError {
                format!("failed to read {}: {e}", path.display()).into()
            })?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(SymmetryConfig::default()),
    }
}

fn run_detect(args: DetectArgs) -> CliResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(n) = args.num_peaks {
        config.peaks.num_peaks = n;
    }

    let img = ImageReader::open(&args.image)
        .map_err(|e| -> CliError {
            format!("failed to open image {}: {e}", args.image.display()).into()
        })?
        .decode()?
        .to_luma8();
    let view = edge_view(&img);
    info!("loaded {}x{} edge image", view.width, view.height);

    let mut detector = SymmetryDetector::from_config(view.width, view.height, &config.accumulator)?;
    let stats = detector.vote(&view, &config.vote)?;

    let mut results = SymmetryResults::with_capacity(config.peaks.num_peaks);
    detector.get_result(&mut results, &config.peaks);

    let lines = report_lines(&detector, &results);
    for (i, line) in lines.iter().enumerate() {
        println!("*****   {i}   *****");
        println!("Refined: {:.3},{:.3}", line.r, line.theta_deg);
        println!("Raw: {:.3},{:.3}", line.raw_r, line.raw_theta_deg);
    }
    if lines.is_empty() {
        println!("no symmetry found");
    }

    if let Some(path) = &args.accumulator {
        accumulator_to_gray(detector.backup()).save(path)?;
        info!("wrote accumulator to {}", path.display());
    }
    if let Some(path) = &args.mask {
        mask_to_gray(detector.mask()).save(path)?;
        info!("wrote mask to {}", path.display());
    }

    if let Some(path) = &args.out {
        let report = DetectReport {
            image_path: args.image.to_string_lossy().into_owned(),
            width: view.width,
            height: view.height,
            r_bins: detector.mapper().r_bins(),
            theta_bins: detector.mapper().theta_bins(),
            edge_points: stats.edge_points,
            votes: stats.votes,
            config,
            lines,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("wrote report to {}", path.display());
    }

    Ok(())
}

fn report_lines(detector: &SymmetryDetector, results: &SymmetryResults) -> Vec<LineReport> {
    results
        .iter()
        .map(|l| LineReport {
            r: l.r,
            theta_deg: l.theta.to_degrees(),
            raw_r: detector.pixel_from_index(l.r_index_raw),
            raw_theta_deg: detector.radians_from_index(l.theta_index_raw).to_degrees(),
            r_index_raw: l.r_index_raw,
            theta_index_raw: l.theta_index_raw,
            votes: l.votes,
        })
        .collect()
}
