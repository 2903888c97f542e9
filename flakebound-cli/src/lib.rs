#![warn(missing_docs)]
//! Flakebound CLI Library
//!
//! Command line front end for the flaky-bug estimator: collects the observed
//! run counts, layers `flakebound.toml` defaults under the flags, runs the
//! analysis and writes the report in the requested format.
//!
//! # Example
//!
//! ```text
//! $ flakebound -n 4 -k 1
//!   Passing runs required after the fix: 38
//! ```

mod analysis;
mod config;
mod formatting;

pub use analysis::{AnalysisRequest, analyze, sample_curve};
pub use config::*;
pub use formatting::{ChartSize, format_human_output};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flakebound_report::{OutputFormat, generate_csv_report, generate_json_report};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Flakebound CLI arguments
#[derive(Parser, Debug)]
#[command(name = "flakebound")]
#[command(
    author,
    version,
    about = "Flakebound - how many passing runs it takes to trust a flaky-bug fix"
)]
pub struct Cli {
    /// Optional subcommand (Analyze, Init); defaults to Analyze
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Number of runs performed before the fix (default from config, else 4)
    #[arg(short = 'n', long, global = true)]
    pub trials: Option<u64>,

    /// Number of runs in which the bug showed up
    #[arg(short = 'k', long, global = true)]
    pub failures: Option<u64>,

    /// Confidence complement, e.g. 0.05 for 95% confidence
    #[arg(long, global = true)]
    pub alpha: Option<f64>,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Curve length as a multiple of the required retest count
    #[arg(long, global = true)]
    pub curve_span: Option<u64>,

    /// Give up beyond this many retests
    #[arg(long, global = true)]
    pub max_retests: Option<u64>,

    /// Skip the text chart in human output
    #[arg(long, global = true)]
    pub no_chart: bool,

    /// Configuration file (otherwise flakebound.toml is discovered)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the failure probability and the retests needed (default)
    Analyze,
    /// Write a default flakebound.toml
    Init {
        /// Where to write the file
        #[arg(default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the Flakebound CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Flakebound CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    let default_filter = if cli.verbose {
        "flakebound_cli=debug"
    } else {
        "flakebound_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Init { ref path, force }) => init_config(path, force),
        Some(Commands::Analyze) | None => {
            let config = load_config(&cli)?;
            run_analysis(&cli, &config)
        }
    }
}

/// Resolve the configuration: `--config` wins, then discovery, then defaults.
fn load_config(cli: &Cli) -> anyhow::Result<FlakeConfig> {
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loading configuration");
        return FlakeConfig::load(path);
    }
    match FlakeConfig::discover()? {
        Some((path, config)) => {
            tracing::debug!(path = %path.display(), "discovered configuration");
            Ok(config)
        }
        None => Ok(FlakeConfig::default()),
    }
}

/// Build an AnalysisRequest by layering: flakebound.toml defaults → CLI overrides.
pub fn build_request(cli: &Cli, config: &FlakeConfig) -> anyhow::Result<AnalysisRequest> {
    let failures = cli
        .failures
        .context("--failures (-k) is required: how many runs showed the bug?")?;

    Ok(AnalysisRequest {
        trials: cli.trials.unwrap_or(config.analysis.trials),
        failures,
        alpha: cli.alpha.unwrap_or(config.analysis.alpha),
        max_retests: cli.max_retests.unwrap_or(config.analysis.max_retests),
        curve_span: cli.curve_span.unwrap_or(config.analysis.curve_span),
        max_curve_points: config.output.max_curve_points,
    })
}

/// Resolve the output format: CLI wins, then flakebound.toml.
pub fn resolve_format(cli: &Cli, config: &FlakeConfig) -> anyhow::Result<OutputFormat> {
    let format = cli.format.as_deref().unwrap_or(&config.output.format);
    format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!(e))
}

fn run_analysis(cli: &Cli, config: &FlakeConfig) -> anyhow::Result<()> {
    let request = build_request(cli, config)?;
    let format = resolve_format(cli, config)?;

    let report = analyze(&request).with_context(|| {
        format!(
            "cannot analyze {} failure(s) in {} run(s) at alpha {}",
            request.failures, request.trials, request.alpha
        )
    })?;
    tracing::info!(
        pmin = report.estimate.pmin,
        required_tests = report.plan.required_tests,
        "analysis complete"
    );

    let chart = (config.output.show_chart && !cli.no_chart).then_some(ChartSize {
        width: config.output.chart_width,
        height: config.output.chart_height,
    });

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report, chart),
    };

    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(path, FlakeConfig::default_toml())
        .with_context(|| format!("cannot write {}", path.display()))?;
    eprintln!("Configuration written to: {}", path.display());
    Ok(())
}
