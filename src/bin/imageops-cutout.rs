//! Command-line front end for corner-keyed background removal.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use imageops_cutout::{CutoutConfig, CutoutPipeline, HexColor, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliOutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => Self::Png,
            CliOutputFormat::Jpeg => Self::Jpeg,
            CliOutputFormat::Webp => Self::WebP,
        }
    }
}

/// Remove a uniform background by keying on the image corners
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image
    input: PathBuf,

    /// Output file; defaults to <input>_cutout.<ext>, "-" writes to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with a request configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-channel tolerance for background pixels
    #[arg(short, long)]
    tolerance: Option<u8>,

    /// Downsize inputs whose longer side exceeds this (0 disables)
    #[arg(long)]
    max_dimension: Option<u32>,

    /// Solid background colour, e.g. "#FFFFFF"
    #[arg(short, long)]
    background: Option<HexColor>,

    /// Image placed behind the cut-out, stretched to fit
    #[arg(long, conflicts_with = "background")]
    backdrop_image: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// JPEG quality (1-100)
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// Print {"image": "<base64>"} to stdout instead of writing a file
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    let mut pipeline = CutoutPipeline::with_corner_key(config).context("invalid configuration")?;
    if let Some(path) = &args.backdrop_image {
        let backdrop = image::open(path)
            .with_context(|| format!("failed to open backdrop {}", path.display()))?
            .into_rgba8();
        pipeline = pipeline.with_backdrop_image(backdrop);
    }

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let output = pipeline
        .process_bytes(&bytes)
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    if args.json {
        let body = serde_json::to_string(&output.to_payload())?;
        writeln!(io::stdout().lock(), "{body}")?;
        return Ok(());
    }

    match args.output.as_deref() {
        Some(path) if path == Path::new("-") => io::stdout().lock().write_all(&output.bytes)?,
        Some(path) => write_file(path, &output.bytes)?,
        None => {
            let path = default_output_path(&args.input, output.format);
            write_file(&path, &output.bytes)?;
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<CutoutConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => CutoutConfig::default(),
    };

    if let Some(tolerance) = args.tolerance {
        config = config.with_tolerance(tolerance);
    }
    if let Some(max_dimension) = args.max_dimension {
        config = config.with_max_dimension(Some(max_dimension).filter(|&d| d > 0));
    }
    if let Some(color) = args.background {
        config = config.with_background_color(Some(color));
    }
    if let Some(format) = args.format {
        config = config.with_output_format(format.into());
    }
    if let Some(quality) = args.jpeg_quality {
        config = config.with_jpeg_quality(quality);
    }
    Ok(config)
}

fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}_cutout.{}", format.extension()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("saved {}", path.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imageops_cutout={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
