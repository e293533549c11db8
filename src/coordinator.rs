//! Activation-scoped fetch coordination.
//!
//! Each activation computes its week window once, issues a single read
//! through the [`AggregateSource`], and lands in one of three states. Every
//! activation gets a fresh id; an outcome tagged with an older id is dropped
//! so a slow response can never overwrite a newer activation's result.

use crate::client::{AggregateSource, FetchError};
use crate::models::AggregateCounts;
use crate::week::{WeekSelection, WeekWindow};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Result surface exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonState {
    /// A request is in flight.
    Loading,
    /// The request failed; carries a human-readable message.
    Failed(String),
    /// Counts arrived and parsed.
    Ready(AggregateCounts),
}

/// Ticket for one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub id: u64,
    pub window: WeekWindow,
}

/// Sequences window calculation and the aggregate fetch.
pub struct ComparisonCoordinator<S> {
    source: S,
    selection: WeekSelection,
    current: Option<Activation>,
    state: Option<ComparisonState>,
    next_id: u64,
}

impl<S: AggregateSource> ComparisonCoordinator<S> {
    /// Create a coordinator that compares the week chosen by `selection`.
    pub fn new(source: S, selection: WeekSelection) -> Self {
        Self {
            source,
            selection,
            current: None,
            state: None,
            next_id: 1,
        }
    }

    /// Start a new activation for `reference`.
    ///
    /// Computes the window, moves to [`ComparisonState::Loading`], and
    /// supersedes any earlier activation.
    pub fn activate(&mut self, reference: NaiveDate) -> Activation {
        let window = self.selection.window_for(reference);
        let activation = Activation {
            id: self.next_id,
            window,
        };
        self.next_id += 1;

        if let Some(previous) = &self.current {
            debug!("Activation {} supersedes {}", activation.id, previous.id);
        }

        info!(
            "Activation {}: {} week of {} is {}",
            activation.id, self.selection, reference, activation.window
        );

        self.current = Some(activation.clone());
        self.state = Some(ComparisonState::Loading);
        activation
    }

    /// Issue the read request for `activation`.
    pub async fn fetch(&self, activation: &Activation) -> Result<AggregateCounts, FetchError> {
        debug!("Activation {}: fetching counts", activation.id);
        self.source.fetch_counts(&activation.window).await
    }

    /// Apply a fetch outcome.
    ///
    /// Returns `false` and leaves the state untouched when `activation_id` is
    /// not the current activation.
    pub fn resolve(
        &mut self,
        activation_id: u64,
        outcome: Result<AggregateCounts, FetchError>,
    ) -> bool {
        let current_id = self.current.as_ref().map(|a| a.id);
        if current_id != Some(activation_id) {
            warn!(
                "Discarding stale response for activation {} (current: {:?})",
                activation_id, current_id
            );
            return false;
        }

        self.state = Some(match outcome {
            Ok(counts) => {
                info!(
                    "Activation {}: {} brands, {} booked / {} submitted",
                    activation_id,
                    counts.by_brand.len(),
                    counts.summary.total_booked,
                    counts.summary.total_form_submissions
                );
                ComparisonState::Ready(counts)
            }
            Err(e) => {
                warn!("Activation {} failed: {}", activation_id, e);
                ComparisonState::Failed(e.to_string())
            }
        });
        true
    }

    /// Activate, fetch, and resolve in one step.
    pub async fn refresh(&mut self, reference: NaiveDate) -> &ComparisonState {
        let activation = self.activate(reference);
        let outcome = self.fetch(&activation).await;
        self.resolve(activation.id, outcome);
        self.state.get_or_insert(ComparisonState::Loading)
    }

    /// Current state, or `None` before the first activation.
    pub fn state(&self) -> Option<&ComparisonState> {
        self.state.as_ref()
    }

    /// Window of the current activation.
    pub fn window(&self) -> Option<&WeekWindow> {
        self.current.as_ref().map(|a| &a.window)
    }
}
