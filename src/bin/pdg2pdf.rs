//! CLI binary for pdg2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdg2pdf::{
    convert, ConversionConfig, ConversionProgressCallback, ConversionReport, ProgressCallback,
    Stage,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar, reset for each stage, whose message
/// names the file currently being handled.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage, total: usize) {
        self.bar.reset();
        self.bar.set_length(total as u64);
        self.bar.set_prefix(stage.to_string());
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Conversion from {stage} started ({total} files)"))
        ));
    }

    fn on_page(&self, stage: Stage, index: usize, _total: usize, name: &str) {
        self.bar.set_position(index as u64);
        self.bar.set_message(format!("{} {}", stage.verb(), name));
    }

    fn on_stage_complete(&self, stage: Stage, total: usize) {
        self.bar.set_position(total as u64);
        self.bar.set_message(String::new());
        self.bar.println(format!(
            "  {} Conversion from {stage} completed",
            green("✓")
        ));
        if stage == Stage::Assembling {
            self.bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the .pdg pages in the current folder into <folder>.pdf
  pdg2pdf -p .

  # Convert another folder and pick the output name
  pdg2pdf -p ~/books/dune -o dune.pdf

  # Strip EXIF metadata from each page on the way through
  pdg2pdf -p ~/books/dune -d

  # Machine-readable report
  pdg2pdf -p ~/books/dune --json --no-progress > report.json

PAGE ORDER:
  Pages are sorted by file name, then regrouped by role tag:
    cov  front cover (first match), remaining covers go to the end
    bok  title page
    leg  copyright page
    fow  foreword
  Everything else is the body and keeps its order.

ENVIRONMENT VARIABLES:
  PDG2PDF_PATH, PDG2PDF_OUTPUT, PDG2PDF_DEL_EXIF, PDG2PDF_DPI,
  PDG2PDF_KEEP_SCRATCH, PDG2PDF_JSON, PDG2PDF_NO_PROGRESS,
  PDG2PDF_VERBOSE, PDG2PDF_QUIET
  RUST_LOG overrides the log filter.
"#;

/// Convert a folder of .pdg page images into a single PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdg2pdf",
    version,
    about = "Convert a folder of .pdg page images into a single PDF",
    long_about = "Copies every .pdg file of a folder into a temporary working folder as .jpg, \
optionally strips EXIF metadata, puts cover, title, copyright and foreword pages into book \
order, and writes all pages into one PDF without re-encoding the images.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder holding the .pdg files.
    #[arg(short, long, env = "PDG2PDF_PATH", default_value = ".")]
    path: PathBuf,

    /// Output PDF name (default: <folder name>.pdf, inside the folder).
    #[arg(short, long, env = "PDG2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Remove EXIF metadata from each page image.
    #[arg(short = 'd', long = "del_exif", env = "PDG2PDF_DEL_EXIF")]
    del_exif: bool,

    /// Resolution used to size pages from pixel dimensions (72–600).
    #[arg(long, env = "PDG2PDF_DPI", default_value_t = 72,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Keep the temporary .jpg folder after the run.
    #[arg(long, env = "PDG2PDF_KEEP_SCRATCH")]
    keep_scratch: bool,

    /// Print the conversion report as JSON.
    #[arg(long, env = "PDG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDG2PDF_QUIET")]
    quiet: bool,
}

fn main() -> ExitCode {
    // A bare invocation shows usage instead of converting the current folder.
    if std::env::args_os().len() <= 1 {
        let mut cmd = Cli::command();
        if cmd.print_help().is_ok() {
            println!();
        }
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = convert(&config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report);
    }
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .source_dir(&cli.path)
        .strip_metadata(cli.del_exif)
        .dpi(cli.dpi)
        .keep_scratch(cli.keep_scratch);

    if let Some(ref output) = cli.output {
        builder = builder.output(output);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &ConversionReport) {
    let layout = &report.layout;
    eprintln!(
        "{}  {} pages  {}ms  →  {}",
        green("✔"),
        report.page_count,
        report.stats.total_duration_ms,
        bold(&report.output_path.display().to_string()),
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "covers {}+{}  title {}  copyright {}  foreword {}  body {}",
            layout.front_cover,
            layout.back_cover,
            layout.title,
            layout.copyright,
            layout.foreword,
            layout.body,
        ))
    );
    if report.metadata_stripped > 0 {
        eprintln!(
            "   {}",
            dim(&format!("EXIF removed from {} pages", report.metadata_stripped))
        );
    }
    if let Some(ref dir) = report.scratch_dir {
        eprintln!("   {}", dim(&format!("scratch kept at {}", dir.display())));
    }
}
