//! annotate-cli: Command-line tool for screenshot annotation
//!
//! Annotates images, previews overlay SVG and inspects images without the
//! MCP protocol overhead.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use annotate_core::composite::{Annotator, ResvgCompositor};
use annotate_core::config::RenderConfig;
use annotate_core::model::{AnnotateOptions, AnnotationDescriptor, AnnotationKind};
use annotate_core::render::THEME_NAMES;
use annotate_core::render::color::PALETTE;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "annotate-cli")]
#[command(about = "CLI tool for annotating screenshots and previewing SVG overlays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw annotations onto an image
    Annotate {
        /// Source image (PNG, JPEG or WebP)
        #[arg(short, long)]
        input: PathBuf,
        /// Output path (default: <name>-annotated.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON file with an array of annotations, or - for stdin
        #[arg(short, long)]
        annotations: String,
        /// Theme: default, minimal, bold or dark
        #[arg(long)]
        theme: Option<String>,
    },
    /// Print (or save) the overlay SVG for a canvas size
    RenderSvg {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// JSON file with an array of annotations, or - for stdin
        #[arg(short, long)]
        annotations: String,
        #[arg(long)]
        theme: Option<String>,
        /// Write the SVG here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show image dimensions and format
    Info {
        path: PathBuf,
    },
    /// List colors, themes and annotation types
    Styles,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("annotate_cli=info".parse()?)
                .add_directive("annotate_core=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RenderConfig::from_env();

    match cli.command {
        Commands::Annotate {
            input,
            output,
            annotations,
            theme,
        } => {
            annotate(config, &input, output.as_deref(), &annotations, theme).await?;
        }
        Commands::RenderSvg {
            width,
            height,
            annotations,
            theme,
            out,
        } => {
            render_svg(config, width, height, &annotations, theme.as_deref(), out.as_deref())?;
        }
        Commands::Info { path } => {
            show_info(config, &path).await?;
        }
        Commands::Styles => styles(&config),
    }

    Ok(())
}

fn annotator(config: RenderConfig) -> Annotator {
    let compositor = ResvgCompositor::new()
        .with_font_family(&config.font_family)
        .with_jpeg_quality(config.jpeg_quality);
    Annotator::new(Arc::new(compositor), config)
}

/// Reads an annotation list from a file, or stdin for `-`
fn load_annotations(source: &str) -> Result<Vec<AnnotationDescriptor>> {
    let json = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read annotations from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };
    let annotations = AnnotationDescriptor::parse_list(&json)?;
    debug!("Loaded {} annotations from {}", annotations.len(), source);
    Ok(annotations)
}

async fn annotate(
    config: RenderConfig,
    input: &Path,
    output: Option<&Path>,
    annotations: &str,
    theme: Option<String>,
) -> Result<()> {
    let annotations = load_annotations(annotations)?;
    let summary = annotator(config)
        .annotate(input, output, &annotations, &AnnotateOptions { theme })
        .await?;

    println!("Annotated image saved to: {}", summary.output_path.display());
    println!("  Dimensions: {}x{}", summary.width, summary.height);
    println!(
        "  Annotations: {} rendered of {}",
        summary.rendered, summary.annotation_count
    );
    for skipped in &summary.skipped {
        println!(
            "  Skipped #{}: unknown type '{}'",
            skipped.index, skipped.type_name
        );
    }

    Ok(())
}

fn render_svg(
    config: RenderConfig,
    width: u32,
    height: u32,
    annotations: &str,
    theme: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let annotations = load_annotations(annotations)?;
    // Rendering never touches the compositor, so skip font discovery
    let compositor = ResvgCompositor::with_fontdb(Arc::default());
    let document = Annotator::new(Arc::new(compositor), config)
        .render_svg(width, height, &annotations, theme)?;

    match out {
        Some(path) => {
            fs::write(path, &document.markup)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("SVG saved to: {}", path.display());
        }
        None => println!("{}", document.markup),
    }

    for skipped in &document.skipped {
        eprintln!(
            "warning: skipped #{}: unknown type '{}'",
            skipped.index, skipped.type_name
        );
    }

    Ok(())
}

async fn show_info(config: RenderConfig, path: &Path) -> Result<()> {
    let meta = annotator(config).image_info(path).await?;

    println!("Image: {}", path.display());
    println!("  Dimensions: {}x{}", meta.width, meta.height);
    println!("  Format: {}", meta.format);

    Ok(())
}

fn styles(config: &RenderConfig) {
    println!("Colors:");
    for (name, hex) in PALETTE {
        println!("  {:<8} {}", name, hex);
    }

    println!("\nThemes (default: {}):", config.default_theme);
    for name in THEME_NAMES {
        println!("  {}", name);
    }

    println!("\nAnnotation types:");
    for kind in AnnotationKind::ALL {
        let aliases: Vec<&str> = AnnotationKind::ALIASES
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(alias, _)| *alias)
            .collect();
        if aliases.is_empty() {
            println!("  {}", kind);
        } else {
            println!("  {} (also: {})", kind, aliases.join(", "));
        }
    }
}
