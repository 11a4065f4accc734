//! CLI tool for generating slide decks from text and a PowerPoint template.

use anyhow::{Context, Result};
use clap::Parser;
use deckgen_core::{FallbackOutliner, JsonOutliner, Outliner, SlideTextNotes};
use deckgen_pptx::DeckOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Generate a PowerPoint deck from plain text, styled after a template.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template presentation (.pptx or .potx)
    #[arg(short, long)]
    template: PathBuf,

    /// Text file to turn into slides (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Outline JSON, or a model response containing one
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Extra guidance passed to the outliner
    #[arg(short, long, default_value = "")]
    guidance: String,

    /// Image to interleave between content slides (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Output directory (default: system temp dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Place an image after every Nth content slide (0 disables images)
    #[arg(long, default_value = "3")]
    image_every: usize,

    /// Print the outline as JSON instead of building a deck
    #[arg(long)]
    print_outline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let text = read_text(args.input.as_deref())?;
    let outliner = outliner(args.outline.as_deref())?;

    if args.print_outline {
        let outline = outliner.analyze(&text, &args.guidance);
        let json =
            serde_json::to_string_pretty(&outline).context("Failed to serialize outline")?;
        println!("{}", json);
        return Ok(());
    }

    let mut options = DeckOptions::new().with_image_cadence(args.image_every);
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        options = options.with_output_dir(dir);
    }

    if args.verbose {
        eprintln!("Template: {}", args.template.display());
        if !args.images.is_empty() {
            eprintln!("  {} image(s) available", args.images.len());
        }
    }

    let notes = SlideTextNotes;
    let path = deckgen_pptx::generate(
        &text,
        &args.guidance,
        &args.template,
        &args.images,
        outliner.as_ref(),
        &notes,
        &options,
    )
    .with_context(|| format!("Failed to generate deck from {}", args.template.display()))?;

    println!("{}", path.display());
    Ok(())
}

/// Read the source text from a file, or stdin when no file is given.
fn read_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            Ok(text)
        }
    }
}

/// The outliner for this run: a stored outline when given, otherwise the
/// text-driven fallback.
fn outliner(outline: Option<&Path>) -> Result<Box<dyn Outliner>> {
    match outline {
        Some(path) => {
            let response = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read outline {}", path.display()))?;
            log::debug!("Using outline from {}", path.display());
            Ok(Box::new(JsonOutliner::new(response)))
        }
        None => Ok(Box::new(FallbackOutliner::new())),
    }
}
