//! Report rendering.
//!
//! This module renders a [`ComparisonReport`] as a terminal summary,
//! a Markdown document, or JSON.

use crate::cli::OutputFormat;
use crate::comparison::{mismatched_brands, ComparisonStatus};
use crate::models::{BrandRow, ComparisonReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Rendering switches.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Print the status legend.
    pub show_legend: bool,
    /// Wrap status icons in ANSI colours (text format only).
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            color: false,
        }
    }
}

/// Render `report` in the requested format.
pub fn render(report: &ComparisonReport, format: OutputFormat, options: RenderOptions) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(report, options)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report, options)),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// ANSI escape for a status colour name.
fn ansi_code(color: &str) -> &'static str {
    match color {
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "red" => "\x1b[31m",
        _ => "\x1b[90m",
    }
}

fn paint(status: ComparisonStatus, text: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}\x1b[0m", ansi_code(status.color()), text)
    } else {
        text.to_string()
    }
}

fn legend() -> String {
    [
        ComparisonStatus::Synced,
        ComparisonStatus::Partial,
        ComparisonStatus::Missing,
    ]
    .iter()
    .map(|s| format!("{} {}", s.emoji(), s))
    .collect::<Vec<_>>()
    .join("  ")
}

/// Generate the terminal summary.
pub fn generate_text_report(report: &ComparisonReport, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("📅 Weekly Overview: {}\n", report.window.label));
    output.push_str(&format!(
        "   {} to {}\n\n",
        report.window.start_date, report.window.end_date
    ));

    // Zero totals still list any brands the backend reported
    if report.is_empty() {
        output.push_str("📅 No data for this week\n");
        if report.brands.is_empty() {
            return output;
        }
        output.push('\n');
    }

    let summary = &report.summary;
    output.push_str(&format!(
        "Booked: {}   Form Filled: {}   {}\n\n",
        summary.total_booked,
        summary.total_form_submissions,
        paint(
            summary.status,
            &format!("{} {}", summary.status.emoji(), summary.status),
            options.color
        )
    ));

    output.push_str("By Brand:\n");
    if report.brands.is_empty() {
        output.push_str("  (no brands)\n");
    }

    let width = report
        .brands
        .iter()
        .map(|r| r.brand.chars().count())
        .max()
        .unwrap_or(0);

    for row in &report.brands {
        output.push_str(&format!(
            "  {:<width$}  {:>4} / {:<4} {}\n",
            row.brand,
            row.booked,
            row.form_submissions,
            paint(row.status, row.status.emoji(), options.color),
            width = width
        ));
    }

    if options.show_legend {
        output.push('\n');
        output.push_str(&legend());
        output.push('\n');
    }

    output
}

/// Generate a Markdown report.
pub fn generate_markdown_report(report: &ComparisonReport, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("# Weekly Comparison\n\n");

    // Metadata section
    output.push_str(&format!("## {}\n\n", report.window.label));
    output.push_str(&format!(
        "- **Window:** {} to {}\n",
        report.window.start_date, report.window.end_date
    ));
    output.push_str(&format!(
        "- **Generated:** {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if report.is_empty() {
        output.push_str("No data for this week.\n\n");
        if report.brands.is_empty() {
            output.push_str(&generate_footer());
            return output;
        }
    }

    output.push_str(&generate_summary_section(report));
    output.push_str(&generate_brand_section(&report.brands));
    output.push_str(&generate_attention_section(&report.brands));

    if options.show_legend {
        output.push_str(&format!("{}\n\n", legend()));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the summary section.
fn generate_summary_section(report: &ComparisonReport) -> String {
    let mut section = String::new();
    let summary = &report.summary;

    section.push_str("## Summary\n\n");
    section.push_str("| Booked | Form Filled | Status |\n");
    section.push_str("|:---:|:---:|:---|\n");
    section.push_str(&format!(
        "| {} | {} | {} {} |\n\n",
        summary.total_booked,
        summary.total_form_submissions,
        summary.status.emoji(),
        summary.status
    ));

    section.push_str(&format!(
        "| {} Synced | {} Partial | {} Missing | {} No data |\n",
        ComparisonStatus::Synced.emoji(),
        ComparisonStatus::Partial.emoji(),
        ComparisonStatus::Missing.emoji(),
        ComparisonStatus::NoData.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        report.tally.count(ComparisonStatus::Synced),
        report.tally.count(ComparisonStatus::Partial),
        report.tally.count(ComparisonStatus::Missing),
        report.tally.count(ComparisonStatus::NoData),
    ));

    section
}

/// Generate the per-brand table.
fn generate_brand_section(rows: &[BrandRow]) -> String {
    let mut section = String::new();

    section.push_str("## By Brand\n\n");

    if rows.is_empty() {
        section.push_str("No brands reported for this week.\n\n");
        return section;
    }

    section.push_str("| Brand | Booked | Form Filled | Status |\n");
    section.push_str("|:---|:---:|:---:|:---|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} {} |\n",
            row.brand,
            row.booked,
            row.form_submissions,
            row.status.emoji(),
            row.status
        ));
    }
    section.push('\n');

    section
}

/// List brands whose counts disagree.
fn generate_attention_section(rows: &[BrandRow]) -> String {
    let mismatched = mismatched_brands(rows);
    if mismatched.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Needs Attention\n\n");

    for row in mismatched {
        let detail = match row.status {
            ComparisonStatus::Partial => format!(
                "{} booked without a form submission",
                row.booked - row.form_submissions
            ),
            _ => format!(
                "{} form submissions without a booking",
                row.form_submissions - row.booked
            ),
        };
        section.push_str(&format!(
            "- {} **{}**: {}\n",
            row.status.emoji(),
            row.brand,
            detail
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by weeklysync*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ComparisonReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered output to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
