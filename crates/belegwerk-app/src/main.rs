// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Belegwerk — Receipt scanning from the command line.
//
// `belegwerk detect` prints the receipt outline found in a photo as JSON;
// `belegwerk process` rectifies and enhances the receipt along an outline.
// Diagnostics go to stderr via tracing; results go to stdout or files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use belegwerk_core::{Contour, EnhancementParams, ScanConfig};
use belegwerk_document::{ProcessRequest, ReceiptScanner};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "belegwerk")]
#[command(about = "Detect, straighten, and clean up photographed receipts")]
struct Cli {
    /// JSON scan configuration (defaults are used when omitted)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the receipt outline and print it as JSON
    Detect {
        /// Path to the receipt photo
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Write a JPEG preview with the outline drawn on it
        #[arg(long, value_name = "FILE")]
        preview: Option<PathBuf>,
    },

    /// Rectify and enhance the receipt along an outline
    Process {
        /// Path to the receipt photo
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Four corners as JSON, e.g. '[[10,10],[190,10],[190,90],[10,90]]'
        #[arg(long, value_name = "JSON")]
        contour: String,

        /// Brightness shift in [-100, 100]
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        brightness: i32,

        /// Contrast factor in [0.5, 2.0]
        #[arg(long, default_value_t = 1.0)]
        contrast: f32,

        /// Apply non-local-means denoising before tone adjustment
        #[arg(long)]
        denoise: bool,

        /// Write the processed receipt as JPEG
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    let scanner = ReceiptScanner::new(config)?;
    tracing::debug!(config = ?scanner.config(), "Scanner ready");

    match cli.command {
        Command::Detect { image, preview } => detect(&scanner, &image, preview.as_deref()),
        Command::Process {
            image,
            contour,
            brightness,
            contrast,
            denoise,
            output,
        } => {
            let request = ProcessRequest {
                contour: serde_json::from_str(&contour)
                    .context("--contour must be a JSON array of [x, y] pairs")?,
                brightness,
                contrast,
                denoise,
            };
            let (contour, params) = request.validate()?;
            process(&scanner, &image, &contour, &params, &output)
        }
    }
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn detect(scanner: &ReceiptScanner, image: &Path, preview: Option<&Path>) -> anyhow::Result<()> {
    let result = scanner.detect(&read_image(image)?)?;

    if let Some(path) = preview {
        let jpeg = result.preview_jpeg(scanner.rasterizer(), scanner.config().preview_quality)?;
        std::fs::write(path, jpeg)
            .with_context(|| format!("failed to write preview {}", path.display()))?;
        tracing::info!(path = %path.display(), "Preview written");
    }

    println!("{}", serde_json::to_string(&result.contour)?);
    Ok(())
}

fn process(
    scanner: &ReceiptScanner,
    image: &Path,
    contour: &Contour,
    params: &EnhancementParams,
    output: &Path,
) -> anyhow::Result<()> {
    let result = scanner.process(&read_image(image)?, contour, params)?;
    let jpeg = result.to_jpeg(scanner.rasterizer(), scanner.config().output_quality)?;

    std::fs::write(output, &jpeg)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        path = %output.display(),
        width = result.image.width(),
        height = result.image.height(),
        "Processed receipt written"
    );
    Ok(())
}
