//! Per-brand aggregation of classified counts.
//!
//! Turns the raw [`AggregateCounts`] from the comparison endpoint into the
//! display-ready [`ComparisonReport`].

use crate::comparison::ComparisonStatus;
use crate::models::{AggregateCounts, BrandRow, ComparisonReport, StatusTally, SummaryRow};
use crate::week::WeekWindow;
use chrono::Utc;
use tracing::{debug, warn};

/// Classify every brand, sorted by brand name.
pub fn brand_rows(counts: &AggregateCounts) -> Vec<BrandRow> {
    counts
        .by_brand
        .iter()
        .map(|(brand, c)| BrandRow {
            brand: brand.clone(),
            booked: c.booked,
            form_submissions: c.form_submissions,
            status: c.status(),
        })
        .collect()
}

/// Count brands per status.
pub fn tally_statuses(rows: &[BrandRow]) -> StatusTally {
    let mut tally = StatusTally::default();

    for row in rows {
        match row.status {
            ComparisonStatus::Synced => tally.synced += 1,
            ComparisonStatus::Partial => tally.partial += 1,
            ComparisonStatus::Missing => tally.missing += 1,
            ComparisonStatus::NoData => tally.no_data += 1,
        }
    }

    tally
}

/// Rows whose counts disagree, worst first (missing, then partial).
pub fn mismatched_brands(rows: &[BrandRow]) -> Vec<&BrandRow> {
    let mut mismatched: Vec<&BrandRow> = rows.iter().filter(|r| r.status.is_mismatch()).collect();
    mismatched.sort_by(|a, b| {
        b.status
            .cmp(&a.status)
            .then_with(|| a.brand.cmp(&b.brand))
    });
    mismatched
}

/// Build the report for `window` from the fetched counts.
pub fn build_report(window: &WeekWindow, counts: &AggregateCounts) -> ComparisonReport {
    if !counts.week_range.matches(window) {
        let overlaps = window.contains(counts.week_range.start_date)
            || window.contains(counts.week_range.end_date);
        warn!(
            "Server returned counts for {} to {} ({} the requested {})",
            counts.week_range.start_date,
            counts.week_range.end_date,
            if overlaps { "overlapping" } else { "outside" },
            window
        );
    }

    if counts.summary.is_empty() {
        debug!("No bookings or submissions for {}", window.label);
    }

    let brands = brand_rows(counts);
    let tally = tally_statuses(&brands);

    ComparisonReport {
        window: window.clone(),
        generated_at: Utc::now(),
        summary: SummaryRow {
            total_booked: counts.summary.total_booked,
            total_form_submissions: counts.summary.total_form_submissions,
            status: counts.summary.status(),
        },
        brands,
        tally,
    }
}
