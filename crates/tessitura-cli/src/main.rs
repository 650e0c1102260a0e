//! tessitura - per-part pitch histograms with voice-range shading
//!
//! `tessitura song.mid` charts every track of one file; `tessitura dir/`
//! merges each MIDI file in the directory into one chart per file.

use anyhow::{bail, Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tessconf::{OutputFormat, TessConfig};
use tessitura::{Input, JsonRenderer, MidiDecoder, Renderer, Report, SvgRenderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod catalog;

#[derive(Parser)]
#[command(name = "tessitura")]
#[command(about = "Pitch histograms per part, shaded with the part's voice range")]
#[command(version)]
struct Cli {
    /// MIDI file, or a directory of MIDI files
    path: PathBuf,

    /// Config file (replaces ./tessitura.toml)
    #[arg(short, long, env = "TESSITURA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the figure is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Figure format: svg or json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Print the summary only
    #[arg(long)]
    no_render: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        if !path.is_file() {
            bail!("config file {} does not exist", path.display());
        }
    }

    let (mut config, sources) = TessConfig::load_with_sources_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging(&config.logging.log_level);

    for file in &sources.files {
        info!(path = %file.display(), "loaded config");
    }
    if !sources.env_overrides.is_empty() {
        info!(vars = ?sources.env_overrides, "environment overrides applied");
    }

    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    let catalog = catalog::build(&config).context("invalid voice configuration")?;

    let input = Input::resolve(&cli.path, &config.input.extensions)?;
    info!(path = %input.path.display(), batch = input.is_batch(), "resolved input");

    let collection = input
        .collector
        .collect(&MidiDecoder)
        .with_context(|| format!("failed to read {}", input.path.display()))?;

    for failure in &collection.failures {
        eprintln!(
            "{} {}: {}",
            "skipped".yellow(),
            failure.path.display(),
            failure.message
        );
    }

    let report = Report::build(collection.entities, &catalog);
    println!("{}", report);

    if cli.no_render || !report.has_data() {
        return Ok(());
    }

    let dir = &config.output.dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let renderer = renderer_for(config.output.format, dir, input.output_stem());
    if let Some(path) = report.render(renderer.as_ref(), &input.title())? {
        info!(path = %path.display(), panels = report.panels().len(), "figure written");
        eprintln!("{} {}", "wrote".green(), path.display());
    }

    Ok(())
}

fn renderer_for(format: OutputFormat, dir: &Path, stem: String) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Svg => Box::new(SvgRenderer::new(dir, stem)),
        OutputFormat::Json => Box::new(JsonRenderer::new(dir, stem)),
    }
}

/// Logs go to stderr; stdout carries the summary.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
