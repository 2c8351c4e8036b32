use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use epub_covers_core::config::load_config;
use epub_covers_core::http::Endpoints;
use epub_covers_core::pipeline::{ArchiveOutcome, CoverPipeline, RunSummary};
use epub_covers_core::progress::{ProgressEvent, ProgressHandler, Stage};

#[derive(Parser)]
#[command(name = "epub-covers")]
#[command(about = "Download a cover.jpg next to every EPUB in a directory tree")]
#[command(version)]
struct Cli {
    /// Root directory to search for .epub files
    root: PathBuf,

    /// Google Books API key used for title searches
    #[arg(long, env = "GOOGLE_BOOKS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Log every pipeline step
    #[arg(short, long)]
    verbose: bool,

    /// Serve all provider endpoints from this base URL (testing)
    #[arg(long, env = "EPUB_COVERS_ENDPOINT_BASE", hide = true)]
    endpoint_base: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let endpoints = cli
        .endpoint_base
        .as_deref()
        .map(Endpoints::with_base)
        .unwrap_or_default();

    let pipeline = CoverPipeline::from_config(&load_config(), cli.api_key.as_deref(), &endpoints)?;

    let reporter = ConsoleProgress::new(cli.json || cli.verbose);
    let summary = pipeline.run(&cli.root, Some(&reporter));
    reporter.finish();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Progress bar plus one line per finished archive.
struct ConsoleProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl ConsoleProgress {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::with_template("[{pos}/{len}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            ProgressBar::new(0).with_style(style)
        };
        Self { bar, quiet }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressHandler for ConsoleProgress {
    fn on_progress(&self, event: ProgressEvent) {
        if let Some(total) = event.total {
            self.bar.set_length(total);
        }
        let name = display_name(&event.archive);
        match event.stage {
            Stage::Started => self.bar.set_message(name),
            Stage::Extracting => self.bar.set_message(format!("{name}: reading metadata")),
            Stage::SearchingTitle(title) => {
                self.bar.set_message(format!("{name}: searching for \"{title}\""))
            }
            Stage::FetchingCover(isbn) => {
                self.bar.set_message(format!("{name}: fetching cover for {isbn}"))
            }
            Stage::Finished(outcome) => {
                if !self.quiet {
                    self.bar.println(describe(&name, &outcome));
                }
                self.bar.inc(1);
            }
        }
    }
}

fn display_name(archive: &Path) -> String {
    archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| archive.display().to_string())
}

fn describe(name: &str, outcome: &ArchiveOutcome) -> String {
    match outcome {
        ArchiveOutcome::CoverExists => format!("{name}: cover already exists, skipped"),
        ArchiveOutcome::MissingArchive => format!("{name}: file not found"),
        ArchiveOutcome::Unresolved => format!("{name}: no ISBN found"),
        ArchiveOutcome::NoCover { isbn } => format!("{name}: no cover found for {isbn}"),
        ArchiveOutcome::Saved { isbn, provider, path } => {
            format!("{name}: {isbn} cover from {provider} saved to {}", path.display())
        }
        ArchiveOutcome::Failed { reason } => format!("{name}: failed: {reason}"),
    }
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Processed {} archive(s): {} saved, {} already had a cover, {} without cover",
        summary.archives.len(),
        summary.saved(),
        summary.skipped(),
        summary.missing()
    );
}
