//! Data models for the weekly comparison.
//!
//! This module contains the aggregate counts returned by the comparison
//! endpoint and the display-ready report built from them.

use crate::comparison::ComparisonStatus;
use crate::week::WeekWindow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date range echoed back by the comparison endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeekRange {
    /// Whether this range covers exactly the given window.
    pub fn matches(&self, window: &WeekWindow) -> bool {
        self.start_date == window.start_date && self.end_date == window.end_date
    }
}

/// Totals across every brand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Campaigns booked for the week.
    #[serde(alias = "total_scheduled")]
    pub total_booked: u64,
    /// Booking forms submitted for the week.
    pub total_form_submissions: u64,
}

impl Summary {
    pub fn status(&self) -> ComparisonStatus {
        ComparisonStatus::from_counts(self.total_booked, self.total_form_submissions)
    }

    /// Both totals are zero.
    pub fn is_empty(&self) -> bool {
        self.total_booked == 0 && self.total_form_submissions == 0
    }
}

/// Booked and submitted counts for one brand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCounts {
    #[serde(alias = "scheduled")]
    pub booked: u64,
    pub form_submissions: u64,
}

impl BrandCounts {
    pub fn status(&self) -> ComparisonStatus {
        ComparisonStatus::from_counts(self.booked, self.form_submissions)
    }
}

/// Aggregate counts for one week, as returned by the comparison endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    /// Range the server computed the counts for.
    pub week_range: WeekRange,
    /// Totals across all brands.
    pub summary: Summary,
    /// Per-brand counts keyed by brand name.
    #[serde(default)]
    pub by_brand: BTreeMap<String, BrandCounts>,
}

/// One brand line in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRow {
    pub brand: String,
    pub booked: u64,
    pub form_submissions: u64,
    pub status: ComparisonStatus,
}

/// Summary line in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub total_booked: u64,
    pub total_form_submissions: u64,
    pub status: ComparisonStatus,
}

/// Number of brands in each status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub synced: usize,
    pub partial: usize,
    pub missing: usize,
    pub no_data: usize,
}

impl StatusTally {
    /// Count for a single status.
    pub fn count(&self, status: ComparisonStatus) -> usize {
        match status {
            ComparisonStatus::Synced => self.synced,
            ComparisonStatus::Partial => self.partial,
            ComparisonStatus::Missing => self.missing,
            ComparisonStatus::NoData => self.no_data,
        }
    }

    /// Brands whose counts disagree.
    pub fn mismatched(&self) -> usize {
        self.partial + self.missing
    }
}

/// Display-ready weekly comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Window the comparison covers.
    pub window: WeekWindow,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Overall totals and their status.
    pub summary: SummaryRow,
    /// Per-brand rows, sorted by brand name.
    pub brands: Vec<BrandRow>,
    /// Brand counts per status.
    pub tally: StatusTally,
}

impl ComparisonReport {
    /// No bookings and no submissions at all.
    pub fn is_empty(&self) -> bool {
        self.summary.total_booked == 0 && self.summary.total_form_submissions == 0
    }

    /// Whether the summary or any brand is partial or missing.
    pub fn has_mismatch(&self) -> bool {
        self.summary.status.is_mismatch() || self.tally.mismatched() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comparison_response() {
        let body = r#"{
            "week_range": {"start_date": "2025-09-08", "end_date": "2025-09-14"},
            "summary": {"total_booked": 10, "total_form_submissions": 10},
            "by_brand": {
                "A": {"booked": 2, "form_submissions": 2},
                "B": {"booked": 0, "form_submissions": 0}
            }
        }"#;

        let counts: AggregateCounts = serde_json::from_str(body).unwrap();
        assert_eq!(counts.summary.total_booked, 10);
        assert_eq!(counts.by_brand.len(), 2);
        assert_eq!(counts.by_brand["A"].status(), ComparisonStatus::Synced);
        assert_eq!(counts.by_brand["B"].status(), ComparisonStatus::NoData);
        assert_eq!(counts.summary.status(), ComparisonStatus::Synced);
    }

    #[test]
    fn test_parse_legacy_scheduled_fields() {
        let body = r#"{
            "week_range": {"start_date": "2025-09-08", "end_date": "2025-09-14"},
            "summary": {"total_scheduled": 4, "total_form_submissions": 3},
            "by_brand": {"A": {"scheduled": 4, "form_submissions": 3}}
        }"#;

        let counts: AggregateCounts = serde_json::from_str(body).unwrap();
        assert_eq!(counts.summary.total_booked, 4);
        assert_eq!(counts.by_brand["A"].booked, 4);
        assert_eq!(counts.by_brand["A"].status(), ComparisonStatus::Partial);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let body = r#"{
            "week_range": {"start_date": "2025-09-08", "end_date": "2025-09-14"},
            "summary": {"total_booked": -1, "total_form_submissions": 0},
            "by_brand": {}
        }"#;

        assert!(serde_json::from_str::<AggregateCounts>(body).is_err());
    }

    #[test]
    fn test_missing_by_brand_defaults_to_empty() {
        let body = r#"{
            "week_range": {"start_date": "2025-09-08", "end_date": "2025-09-14"},
            "summary": {"total_booked": 0, "total_form_submissions": 0}
        }"#;

        let counts: AggregateCounts = serde_json::from_str(body).unwrap();
        assert!(counts.by_brand.is_empty());
        assert!(counts.summary.is_empty());
    }

    #[test]
    fn test_status_tally() {
        let tally = StatusTally {
            synced: 2,
            partial: 1,
            missing: 3,
            no_data: 0,
        };
        assert_eq!(tally.count(ComparisonStatus::Missing), 3);
        assert_eq!(tally.mismatched(), 4);
    }
}
