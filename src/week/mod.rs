//! Week window calculation.

pub mod window;

pub use window::{today, WeekSelection, WeekWindow};
