use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pigment::models::{AppConfig, ScaleFactor, Size, StrokeFile};
use pigment::rendering::{Magnifier, SwatchSheetRenderer};
use pigment::services::{
    ColorSamplingSession, ExportFormat, HttpImageSource, MaskPainterSession, PixelLoader,
};

#[derive(Parser)]
#[command(name = "pigment")]
#[command(about = "Palette extraction, eyedropper sampling and inpainting masks from the command line")]
struct Cli {
    /// YAML configuration file (defaults to $CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the dominant colors of an image
    Extract {
        /// Image URL, file:// URL or path
        url: String,

        /// Number of colors (defaults to extraction.count from the config)
        #[arg(short, long)]
        count: Option<usize>,

        /// Output format: json, css, theme or png
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Write to a file instead of stdout (required for png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sample the color of one pixel
    Pick {
        /// Image URL, file:// URL or path
        url: String,

        /// Horizontal position in image pixels
        #[arg(short, long)]
        x: f64,

        /// Vertical position in image pixels
        #[arg(short, long)]
        y: f64,

        /// Also write the magnifier preview to this PNG file
        #[arg(long)]
        magnifier: Option<PathBuf>,
    },
    /// Rasterize brush strokes into a black/white inpainting mask
    Mask {
        /// JSON file with brush size and strokes in display coordinates
        #[arg(short, long)]
        strokes: PathBuf,

        /// Paint surface size, e.g. 512x512
        #[arg(long)]
        surface: Size,

        /// Mask size, normally the image's natural size
        #[arg(long)]
        target: Size,

        /// Display zoom the strokes were drawn at (1.0 = 100%)
        #[arg(short, long, default_value_t = 1.0)]
        zoom: f32,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pigment=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Extract {
            url,
            count,
            format,
            output,
        }) => {
            let config = AppConfig::load(config_path.as_deref());
            run_extract_command(&config, &url, count, format, output.as_deref()).await
        }
        Some(Commands::Pick {
            url,
            x,
            y,
            magnifier,
        }) => {
            let config = AppConfig::load(config_path.as_deref());
            run_pick_command(&config, &url, x, y, magnifier.as_deref()).await
        }
        Some(Commands::Mask {
            strokes,
            surface,
            target,
            zoom,
            output,
        }) => {
            let config = AppConfig::load(config_path.as_deref());
            run_mask_command(&config, &strokes, surface, target, zoom, &output)
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

fn new_session(config: &AppConfig) -> anyhow::Result<ColorSamplingSession> {
    let source = HttpImageSource::new(&config.fetch)?;
    Ok(ColorSamplingSession::new(PixelLoader::new(Arc::new(source))))
}

async fn run_extract_command(
    config: &AppConfig,
    url: &str,
    count: Option<usize>,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    let count = count.unwrap_or(config.extraction.count);

    let dominant = session
        .extract_dominant_colors(url, count)
        .await
        .with_context(|| format!("Extracting colors from {url}"))?
        .to_vec();

    if dominant.is_empty() {
        eprintln!("No dominant colors found (image is blank or transparent)");
    }

    let bytes = match format.render_text(&[], &dominant) {
        Some(text) => text.into_bytes(),
        None => {
            let renderer = SwatchSheetRenderer::new(config.swatch_sheet.clone())?;
            renderer.render_png(&[], &dominant)?
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Writing {}", path.display()))?;
            println!(
                "Wrote {} colors as {format} to {} ({} bytes)",
                dominant.len(),
                path.display(),
                bytes.len()
            );
        }
        None if format == ExportFormat::Png => {
            bail!("--output is required for png output");
        }
        None => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

async fn run_pick_command(
    config: &AppConfig,
    url: &str,
    x: f64,
    y: f64,
    magnifier_path: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = new_session(config)?;
    session
        .set_active_image(url)
        .await
        .with_context(|| format!("Loading {url}"))?;

    let Some(color) = session.sample_at(x, y) else {
        bail!("No image loaded");
    };
    println!("{}", serde_json::to_string_pretty(&color)?);

    if let Some(path) = magnifier_path {
        let mut magnifier = Magnifier::new()?;
        session.render_magnifier(&mut magnifier, x, y);
        let png = magnifier.to_png()?;
        std::fs::write(path, &png).with_context(|| format!("Writing {}", path.display()))?;
        eprintln!("Wrote magnifier to {}", path.display());
    }
    Ok(())
}

fn run_mask_command(
    config: &AppConfig,
    strokes_path: &Path,
    surface: Size,
    target: Size,
    zoom: f32,
    output: &Path,
) -> anyhow::Result<()> {
    if !(zoom.is_finite() && zoom > 0.0) {
        bail!("--zoom must be a positive number, got {zoom}");
    }

    let content = std::fs::read_to_string(strokes_path)
        .with_context(|| format!("Reading {}", strokes_path.display()))?;
    let stroke_file = StrokeFile::from_json(&content)
        .with_context(|| format!("Parsing {}", strokes_path.display()))?;

    let mut painter = MaskPainterSession::new(&config.mask);
    painter.resize_surface(surface)?;
    let stamps = painter.replay(&stroke_file, ScaleFactor::from_zoom(zoom));

    tracing::info!(
        strokes = stroke_file.strokes.len(),
        stamps,
        brush_size = painter.brush_size(),
        "Painted strokes"
    );
    if !painter.has_mask() {
        eprintln!("No strokes were painted; writing an all-black mask");
    }

    let png = painter.export_mask(target)?;
    std::fs::write(output, &png).with_context(|| format!("Writing {}", output.display()))?;
    println!(
        "Wrote {target} mask to {} ({} bytes)",
        output.display(),
        png.len()
    );
    Ok(())
}

/// Show version, configuration source and available commands
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("pigment v{VERSION}");
    println!("Palette extraction and inpainting mask tools\n");

    let config_source = match config_path {
        Some(path) if path.exists() => path.display().to_string(),
        Some(path) => format!("{} (not found, using defaults)", path.display()),
        None => "defaults (no --config or CONFIG_FILE)".to_string(),
    };
    println!("Configuration:");
    println!("  Source: {config_source}");

    let config = AppConfig::load(config_path);
    println!("  fetch.timeout_secs    = {}", config.fetch.timeout_secs);
    println!("  fetch.max_bytes       = {}", config.fetch.max_bytes);
    println!("  extraction.count      = {}", config.extraction.count);
    println!("  mask.brush_size       = {}", config.mask.brush_size);
    println!("  swatch_sheet.title    = {}", config.swatch_sheet.title);

    println!("\nCommands:");
    println!("  pigment extract <URL> [--count N] [--format json|css|theme|png] [--output FILE]");
    println!("  pigment pick <URL> --x X --y Y [--magnifier FILE]");
    println!("  pigment mask --strokes FILE --surface WxH --target WxH [--zoom Z] --output FILE");
    println!("\nRun 'pigment <command> --help' for details.");
}
