//! WeeklySync - booked campaigns vs. form submissions for next week
//!
//! A CLI tool that computes the upcoming Monday-to-Sunday window, fetches
//! booked and submitted counts per brand from the dashboard backend, and
//! reports which brands are synced, partial, or missing.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, failed fetch, unwritable output)
//!   2 - A brand is partial or missing and --fail-on-mismatch is set

mod cli;
mod client;
mod comparison;
mod config;
mod coordinator;
mod models;
mod report;
mod week;

use anyhow::{bail, Context, Result};
use cli::Args;
use client::HttpAggregateSource;
use config::Config;
use coordinator::{ComparisonCoordinator, ComparisonState};
use indicatif::{ProgressBar, ProgressStyle};
use report::RenderOptions;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging starts so `[general] verbose` can set the level
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("WeeklySync v{}", env!("CARGO_PKG_VERSION"));
    origin.log();
    debug!("Arguments: {:?}", args);

    match run_comparison(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Comparison failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .weeklysync.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE_NAME);
    println!("   Edit it to point at your dashboard backend.");
    Ok(())
}

/// Initialize logging at `level`.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one comparison. Returns the exit code (0 or 2).
async fn run_comparison(args: Args, config: Config) -> Result<i32> {
    // Config file values skip CLI validation, so check them here
    cli::validate_base_url(&config.api.base_url).map_err(anyhow::Error::msg)?;
    cli::validate_endpoint(&config.api.endpoint).map_err(anyhow::Error::msg)?;

    let source = HttpAggregateSource::new(&config.api.base_url, &config.api.endpoint)?;
    let mut coordinator = ComparisonCoordinator::new(source, args.week);

    let reference = args.date.unwrap_or_else(week::today);

    let spinner = loading_spinner(&args);
    coordinator.refresh(reference).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let window = coordinator
        .window()
        .context("No active week window")?;

    let counts = match coordinator.state() {
        Some(ComparisonState::Ready(counts)) => counts,
        Some(ComparisonState::Failed(message)) => {
            bail!("Error loading data for {}: {}", window.label, message)
        }
        Some(ComparisonState::Loading) | None => {
            bail!("No result for {}", window.label)
        }
    };

    let report = comparison::build_report(window, counts);

    let to_terminal = config.report.output.is_none() && std::io::stdout().is_terminal();
    let options = RenderOptions {
        show_legend: config.report.show_legend,
        color: to_terminal,
    };
    let rendered = report::render(&report, config.report.format, options)?;

    match config.report.output {
        Some(ref path) => {
            report::write_report(&rendered, path)?;
            info!("Report written to {}", path.display());
            if !args.quiet {
                println!("✅ Report for {} saved to: {}", window.label, path.display());
            }
        }
        None => print!("{}", rendered),
    }

    if args.fail_on_mismatch && report.has_mismatch() {
        warn!(
            "{} brands partial or missing, summary {}",
            report.tally.mismatched(),
            report.summary.status
        );
        eprintln!("\n⛔ Booked and submitted counts disagree. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Spinner shown while the request is in flight.
fn loading_spinner(args: &Args) -> Option<ProgressBar> {
    if args.quiet || !std::io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Loading {} week comparison...", args.week));
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Where the configuration came from.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    /// The default file exists but could not be loaded.
    DefaultFileUnreadable(String),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => {
                info!("Loaded default config from {}", config::CONFIG_FILE_NAME)
            }
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::DefaultFileUnreadable(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((
            Config::default(),
            ConfigOrigin::DefaultFileUnreadable(format!("{:#}", e)),
        )),
    }
}
