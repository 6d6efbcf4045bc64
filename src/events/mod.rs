//! Graph domain events

pub mod graph_events;

pub use graph_events::{
    DomainEvent, MeasurementAdded, MeasurementRemoved, NodeAdded, NodeRemoved, NodeUpdated,
    RelationshipAdded, RelationshipRemoved, StoreImported,
};
