//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::week::WeekSelection;
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// WeeklySync - booked campaigns vs. form submissions, week by week
///
/// Computes next week's Monday-to-Sunday window, fetches booked and
/// submitted counts per brand from the dashboard backend, and reports
/// which brands are synced, partial, or missing.
///
/// Examples:
///   weeklysync
///   weeklysync --api-url https://dash.example.com --date 2025-09-03
///   weeklysync --week current --format markdown -o weekly.md
///   weeklysync --fail-on-mismatch --quiet
///   weeklysync --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the dashboard backend
    ///
    /// Overrides [api].base_url from the config file.
    #[arg(long, value_name = "URL", env = "WEEKLYSYNC_API_URL")]
    pub api_url: Option<String>,

    /// Path of the weekly comparison endpoint
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(short, long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Which week to compare
    #[arg(long, default_value = "next", value_name = "WEEK")]
    pub week: WeekSelection,

    /// Output format (text, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .weeklysync.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Omit the status legend from text and markdown output
    #[arg(long)]
    pub no_legend: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 2 if any brand is partial or missing
    #[arg(long)]
    pub fail_on_mismatch: bool,

    /// Generate a default .weeklysync.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal summary (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            validate_base_url(url)?;
        }

        if let Some(ref endpoint) = self.endpoint {
            validate_endpoint(endpoint)?;
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins over a config file that asks for verbose output.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Check that a base URL uses http or https.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("API URL must start with 'http://' or 'https://'".to_string());
    }
    Ok(())
}

/// Check that an endpoint is an absolute path.
pub fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    if !endpoint.starts_with('/') {
        return Err("Endpoint must start with '/'".to_string());
    }
    Ok(())
}
