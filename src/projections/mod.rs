//! Read models built from domain events

pub mod tree_summary;

pub use tree_summary::{TreeSummary, TreeSummaryProjection};
