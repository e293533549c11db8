//! Booked vs. submitted status classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation status of a booked count against a form-submission count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    /// No submissions to compare against
    NoData,
    /// Booked and submitted counts match
    Synced,
    /// More bookings than submissions
    Partial,
    /// Fewer bookings than submissions
    Missing,
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonStatus::NoData => write!(f, "No data"),
            ComparisonStatus::Synced => write!(f, "Synced"),
            ComparisonStatus::Partial => write!(f, "Partial"),
            ComparisonStatus::Missing => write!(f, "Missing"),
        }
    }
}

impl ComparisonStatus {
    /// Classify a booked count against a submitted count.
    pub fn from_counts(booked: u64, submitted: u64) -> Self {
        classify(booked, submitted)
    }

    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            ComparisonStatus::NoData => "⚪",
            ComparisonStatus::Synced => "✅",
            ComparisonStatus::Partial => "⚠️",
            ComparisonStatus::Missing => "❌",
        }
    }

    /// Display colour name for the status.
    pub fn color(&self) -> &'static str {
        match self {
            ComparisonStatus::NoData => "gray",
            ComparisonStatus::Synced => "green",
            ComparisonStatus::Partial => "yellow",
            ComparisonStatus::Missing => "red",
        }
    }

    /// Whether the counts disagree (bookings and submissions both present but unequal).
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ComparisonStatus::Partial | ComparisonStatus::Missing)
    }
}

/// Classify `booked` against `submitted`.
///
/// Zero submissions always yields [`ComparisonStatus::NoData`], even when
/// bookings exist, because there is no baseline to compare against.
pub fn classify(booked: u64, submitted: u64) -> ComparisonStatus {
    if submitted == 0 {
        return ComparisonStatus::NoData;
    }

    if booked == submitted {
        ComparisonStatus::Synced
    } else if booked > submitted {
        ComparisonStatus::Partial
    } else {
        ComparisonStatus::Missing
    }
}
