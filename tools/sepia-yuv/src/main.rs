//! sepia-yuv - apply the sepia filter to raw I420 video files
//!
//! Input and output are headerless, tightly packed I420 frames (Y, then U,
//! then V, no row padding), as written by `ffmpeg -pix_fmt yuv420p -f rawvideo`.
//!
//! # Usage
//!
//! ```bash
//! # Default warm tint
//! sepia-yuv in.yuv out.yuv --width 1280 --height 720
//!
//! # Flat chroma fill, luma untouched
//! sepia-yuv in.yuv out.yuv --width 640 --height 480 --flat
//!
//! # Parameters from a config file, bias overridden on the command line
//! sepia-yuv in.yuv out.yuv -w 1920 -H 1080 --config sepia.toml --bias 10 -v
//! ```

mod stream;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rtc_sepia_core::{Config, SepiaFilter, SepiaParams};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Apply a sepia tint to raw I420 frames
#[derive(Parser, Debug)]
#[command(name = "sepia-yuv")]
#[command(author, version)]
#[command(about = "Apply a sepia tint to a raw I420 (.yuv) file")]
struct Args {
    /// Raw I420 input file
    input: PathBuf,

    /// Output file (overwritten)
    output: PathBuf,

    /// Frame width in pixels
    #[arg(short, long)]
    width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long)]
    height: u32,

    /// TOML or JSON config file; only the [filter] section is used
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Luma bias override (-255..=255)
    #[arg(long, allow_negative_numbers = true)]
    bias: Option<i16>,

    /// Blend factor override (0.0..=1.0)
    #[arg(long)]
    blend: Option<f32>,

    /// Flat chroma fill: no luma bias, full blend
    #[arg(long, conflicts_with_all = ["bias", "blend"])]
    flat: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Resolve filter parameters: config file, then command-line overrides
    fn params(&self) -> Result<SepiaParams> {
        let mut params = match &self.config {
            Some(path) => {
                Config::from_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?
                    .filter
            }
            None => SepiaParams::default(),
        };

        if self.flat {
            let flat = SepiaParams::flat_tint();
            params.brightness_bias = flat.brightness_bias;
            params.blend_factor = flat.blend_factor;
        }
        if let Some(bias) = self.bias {
            params.brightness_bias = bias;
        }
        if let Some(blend) = self.blend {
            params.blend_factor = blend;
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let params = args.params()?;
    let sepia = SepiaFilter::new(params).context("Invalid filter parameters")?;
    tracing::info!(
        "Filtering {} ({}x{}) with bias={}, target=({}, {}), blend={}",
        args.input.display(),
        args.width,
        args.height,
        params.brightness_bias,
        params.target_u,
        params.target_v,
        params.blend_factor
    );

    let input = File::open(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("Failed to create output {}", args.output.display()))?;

    let frames = stream::process_stream(
        &mut BufReader::new(input),
        &mut BufWriter::new(output),
        &sepia,
        args.width,
        args.height,
    )?;

    tracing::info!("Wrote {} frames to {}", frames, args.output.display());
    Ok(())
}
