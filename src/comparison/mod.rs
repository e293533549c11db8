//! Booked vs. submitted comparison.
//!
//! Classification of count pairs and aggregation of classified brands into
//! a report.

pub mod aggregator;
pub mod classifier;

pub use aggregator::{build_report, mismatched_brands};
pub use classifier::ComparisonStatus;
