//! Clients for the remote aggregate source.

pub mod source;

pub use source::{AggregateSource, FetchError, HttpAggregateSource, DEFAULT_ENDPOINT};
