//! Command-line entry point.
//!
//! ```sh
//! deckscribe data/talk.pptx --notes data/talk_notes.md
//! deckscribe data/talk.pptx out/talk_annotated.pptx --no-pdf -v
//! ```

use chrono::Local;
use clap::{ArgAction, Parser};
use deckscribe::config::Config;
use deckscribe::export::export_pdf;
use deckscribe::layout::Composer;
use deckscribe::notes::load_notes_or_empty;
use deckscribe::ooxml::pptx::Deck;
use deckscribe::render::{
    NoRenderer, OfficeRenderer, PlaceholderFactory, RenderCapability, ScreenshotProvider,
    probe_capability,
};
use deckscribe::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Insert a screenshot-and-notes slide after every slide of a PowerPoint deck
#[derive(Parser, Debug)]
#[command(name = "deckscribe", version)]
struct Args {
    /// Deck to annotate (.pptx)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the annotated deck
    ///
    /// Defaults to `<output_dir>/<input>_output_<timestamp>.pptx`.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Markdown notes with one `## Slide N` section per slide
    #[arg(short, long, value_name = "FILE")]
    notes: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip PDF export of the result
    #[arg(long)]
    no_pdf: bool,

    /// Use placeholder images instead of rendering slides
    #[arg(long)]
    no_render: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Errors only
    #[arg(short, long)]
    quiet: bool,
}

fn verbosity_to_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` takes precedence over the flags.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(args.verbose, args.quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(args.verbose >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            eprintln!("deckscribe: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::load_or_default(args.config.as_deref())?;
    let output = args.output.clone().unwrap_or_else(|| {
        config.default_output_path(&args.input, Local::now().naive_local())
    });
    let mut deck = Deck::open(&args.input)?;
    let slide_count = deck.slide_count();
    info!(input = %args.input.display(), slides = slide_count, "deck opened");

    let notes = load_notes_or_empty(args.notes.as_deref(), slide_count);

    let mut render = config.render.clone();
    if args.no_render {
        render.enabled = false;
    }
    let capability = probe_capability(&render);
    if let RenderCapability::Unavailable { reason } = &capability {
        warn!(reason = %reason, "slide rendering unavailable, using placeholders");
    }
    let mut screenshots: Box<dyn ScreenshotProvider> =
        match OfficeRenderer::from_capability(&args.input, &capability, &render) {
            Some(renderer) => Box::new(renderer.with_expected_pages(slide_count)),
            None => Box::new(NoRenderer::new("slide rendering unavailable")),
        };
    let mut placeholders = PlaceholderFactory::new(render.cache_dir.join("placeholders"));

    let composer = Composer::new(config.layout.clone(), config.typography.clone(), capability);
    let report = composer.compose(&mut deck, &notes, screenshots.as_mut(), &mut placeholders)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    deck.save(&output)?;
    println!(
        "Saved: {} ({} slides, {} with notes, {} placeholders)",
        output.display(),
        report.originals + report.inserted,
        report.notes_placed,
        report.placeholders_used
    );

    if args.no_pdf {
        return Ok(());
    }
    match export_pdf(&output, render.soffice.as_deref()) {
        Ok(pdf) => println!("PDF created: {}", pdf.display()),
        Err(e @ Error::RenderingUnavailable(_)) => warn!(error = %e, "PDF export skipped"),
        Err(e) => warn!(error = %e, "PDF conversion failed"),
    }
    Ok(())
}
