//! Report rendering.

pub mod generator;

pub use generator::{render, write_report, RenderOptions};
