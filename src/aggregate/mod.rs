//! Graph aggregate
//!
//! The [`GraphStore`] owns every node, relationship, and measurement and is
//! the only place graph structure is mutated.

pub mod entities;
pub mod graph_store;

pub use entities::{
    ImpactTree, Measurement, MeasurementDraft, Node, NodeDraft, NodePatch, Relationship,
};
pub use graph_store::{GraphStore, NodeRemoval, StoreError, ValidationError};
