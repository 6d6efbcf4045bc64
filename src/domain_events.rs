//! Domain events enum for the impact graph

use crate::events::{
    DomainEvent, MeasurementAdded, MeasurementRemoved, NodeAdded, NodeRemoved, NodeUpdated,
    RelationshipAdded, RelationshipRemoved, StoreImported,
};
use serde::{Deserialize, Serialize};

/// Enum wrapper for impact graph domain events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImpactGraphEvent {
    /// A node was added to the graph
    NodeAdded(NodeAdded),
    /// A node's properties or position changed
    NodeUpdated(NodeUpdated),
    /// A node was removed along with its relationships and measurements
    NodeRemoved(NodeRemoved),
    /// A relationship was added between nodes
    RelationshipAdded(RelationshipAdded),
    /// A relationship was removed
    RelationshipRemoved(RelationshipRemoved),
    /// A measurement was attached to a node
    MeasurementAdded(MeasurementAdded),
    /// A measurement was removed
    MeasurementRemoved(MeasurementRemoved),
    /// The whole store was replaced by a snapshot import
    StoreImported(StoreImported),
}

impl DomainEvent for ImpactGraphEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::NodeAdded(e) => e.event_type(),
            Self::NodeUpdated(e) => e.event_type(),
            Self::NodeRemoved(e) => e.event_type(),
            Self::RelationshipAdded(e) => e.event_type(),
            Self::RelationshipRemoved(e) => e.event_type(),
            Self::MeasurementAdded(e) => e.event_type(),
            Self::MeasurementRemoved(e) => e.event_type(),
            Self::StoreImported(e) => e.event_type(),
        }
    }

    fn subject(&self) -> String {
        match self {
            Self::NodeAdded(e) => e.subject(),
            Self::NodeUpdated(e) => e.subject(),
            Self::NodeRemoved(e) => e.subject(),
            Self::RelationshipAdded(e) => e.subject(),
            Self::RelationshipRemoved(e) => e.subject(),
            Self::MeasurementAdded(e) => e.subject(),
            Self::MeasurementRemoved(e) => e.subject(),
            Self::StoreImported(e) => e.subject(),
        }
    }
}
