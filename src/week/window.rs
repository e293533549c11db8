//! Week window calculation.
//!
//! A week runs Monday to Sunday. The "next week" window always starts on a
//! Monday strictly after the reference date, so a Monday reference advances a
//! full seven days instead of returning the week it already belongs to.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Number of days from the first to the last day of a window.
const WINDOW_SPAN_DAYS: u64 = 6;

/// Which week a window should be computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WeekSelection {
    /// The Monday-to-Sunday week after the reference date (default)
    #[default]
    Next,
    /// The Monday-to-Sunday week containing the reference date
    Current,
}

impl WeekSelection {
    /// Compute the window for this selection.
    pub fn window_for(self, reference: NaiveDate) -> WeekWindow {
        match self {
            WeekSelection::Next => next_week(reference),
            WeekSelection::Current => current_week(reference),
        }
    }
}

impl fmt::Display for WeekSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekSelection::Next => write!(f, "next"),
            WeekSelection::Current => write!(f, "current"),
        }
    }
}

/// An inclusive Monday-to-Sunday date range with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    /// First day of the window (always a Monday).
    pub start_date: NaiveDate,
    /// Last day of the window, six days after `start_date`.
    pub end_date: NaiveDate,
    /// Human label, e.g. "Week of Sep 8, 2025".
    pub label: String,
}

impl WeekWindow {
    /// Build the window starting on `monday`.
    fn starting_on(monday: NaiveDate) -> Self {
        let end_date = monday
            .checked_add_days(Days::new(WINDOW_SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX);

        Self {
            start_date: monday,
            end_date,
            label: week_label(monday),
        }
    }

    /// Whether `date` falls inside the window, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Start date in the `YYYY-MM-DD` form the aggregate API expects.
    pub fn start_param(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    /// End date in the `YYYY-MM-DD` form the aggregate API expects.
    pub fn end_param(&self) -> String {
        self.end_date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} to {})", self.label, self.start_date, self.end_date)
    }
}

/// Days from `reference` to the next Monday, always in `1..=7`.
///
/// Day of week is encoded 0 = Sunday .. 6 = Saturday.
pub fn days_until_next_monday(reference: NaiveDate) -> u64 {
    let day_of_week = u64::from(reference.weekday().num_days_from_sunday());

    let offset = if day_of_week == 0 {
        1
    } else {
        (8 - day_of_week) % 7
    };

    // A Monday reference gives 0 above; it must still advance a full week.
    if offset == 0 {
        7
    } else {
        offset
    }
}

/// Window for the week after `reference`.
///
/// Within the last week of the calendar range there is no later full week;
/// the result is clamped to [`last_full_week`].
pub fn next_week(reference: NaiveDate) -> WeekWindow {
    let window = reference
        .checked_add_days(Days::new(days_until_next_monday(reference)))
        .filter(|monday| monday.checked_add_days(Days::new(WINDOW_SPAN_DAYS)).is_some())
        .map(WeekWindow::starting_on);

    match window {
        Some(window) => window,
        None => {
            let clamped = last_full_week();
            warn!(
                "No full week after {}; clamping to {}",
                reference, clamped.start_date
            );
            clamped
        }
    }
}

/// The last Monday-to-Sunday week `NaiveDate` can represent.
pub fn last_full_week() -> WeekWindow {
    let latest_start = NaiveDate::MAX - Days::new(WINDOW_SPAN_DAYS);
    let since_monday = u64::from(latest_start.weekday().num_days_from_monday());
    WeekWindow::starting_on(latest_start - Days::new(since_monday))
}

/// Window for the week containing `reference`.
pub fn current_week(reference: NaiveDate) -> WeekWindow {
    let since_monday = u64::from(reference.weekday().num_days_from_monday());
    let monday = reference
        .checked_sub_days(Days::new(since_monday))
        .unwrap_or(reference);

    WeekWindow::starting_on(monday)
}

/// Today's date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format the window label, e.g. "Week of Sep 8, 2025".
pub fn week_label(monday: NaiveDate) -> String {
    format!("Week of {}", monday.format("%b %-d, %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_wednesday_advances_to_following_monday() {
        // 2025-09-03 is a Wednesday
        let window = next_week(date(2025, 9, 3));
        assert_eq!(window.start_date, date(2025, 9, 8));
        assert_eq!(window.end_date, date(2025, 9, 14));
        assert_eq!(window.label, "Week of Sep 8, 2025");
    }

    #[test]
    fn test_sunday_advances_one_day() {
        let sunday = date(2025, 9, 7);
        assert_eq!(days_until_next_monday(sunday), 1);
        assert_eq!(next_week(sunday).start_date, date(2025, 9, 8));
    }

    #[test]
    fn test_monday_advances_full_week() {
        let monday = date(2025, 9, 8);
        assert_eq!(days_until_next_monday(monday), 7);
        assert_eq!(next_week(monday).start_date, date(2025, 9, 15));
    }

    #[test]
    fn test_saturday_advances_two_days() {
        let saturday = date(2025, 9, 13);
        assert_eq!(days_until_next_monday(saturday), 2);
    }

    #[test]
    fn test_window_invariants_hold_across_a_year() {
        let mut day = date(2024, 1, 1);
        for _ in 0..366 {
            let window = next_week(day);
            assert_eq!(window.start_date.weekday(), Weekday::Mon);
            assert_eq!((window.end_date - window.start_date).num_days(), 6);
            assert!(window.start_date > day);
            assert!((window.start_date - day).num_days() <= 7);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        // 2025-12-31 is a Wednesday
        let window = next_week(date(2025, 12, 31));
        assert_eq!(window.start_date, date(2026, 1, 5));
        assert_eq!(window.label, "Week of Jan 5, 2026");
    }

    #[test]
    fn test_current_week_contains_reference() {
        let wednesday = date(2025, 9, 3);
        let window = current_week(wednesday);
        assert_eq!(window.start_date, date(2025, 9, 1));
        assert_eq!(window.end_date, date(2025, 9, 7));
        assert!(window.contains(wednesday));

        let monday = date(2025, 9, 1);
        assert_eq!(current_week(monday).start_date, monday);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = next_week(date(2025, 9, 3));
        assert!(window.contains(date(2025, 9, 8)));
        assert!(window.contains(date(2025, 9, 14)));
        assert!(!window.contains(date(2025, 9, 7)));
        assert!(!window.contains(date(2025, 9, 15)));
    }

    #[test]
    fn test_api_params() {
        let window = next_week(date(2025, 9, 3));
        assert_eq!(window.start_param(), "2025-09-08");
        assert_eq!(window.end_param(), "2025-09-14");
    }

    #[test]
    fn test_next_week_clamps_at_end_of_range() {
        let last = last_full_week();
        assert_eq!(last.start_date.weekday(), Weekday::Mon);
        assert_eq!((last.end_date - last.start_date).num_days(), 6);
        assert!(last.end_date <= NaiveDate::MAX);

        assert_eq!(next_week(NaiveDate::MAX), last);
        assert_eq!(next_week(last.start_date), last);

        // The week before the last one still advances normally
        let before = last.start_date - Days::new(7);
        assert_eq!(next_week(before), last);
    }

    #[test]
    fn test_selection_dispatch() {
        let wednesday = date(2025, 9, 3);
        assert_eq!(
            WeekSelection::Next.window_for(wednesday),
            next_week(wednesday)
        );
        assert_eq!(
            WeekSelection::Current.window_for(wednesday),
            current_week(wednesday)
        );
    }
}
