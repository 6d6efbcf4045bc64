//! Graph domain events
//!
//! Emitted by the interaction controller as part of its effect list after
//! every accepted store mutation. Read models (projections) and external
//! collaborators consume these; they never mutate the store.

use serde::{Deserialize, Serialize};

use crate::aggregate::{Measurement, Node, Relationship};
use crate::identifiers::{MeasurementId, NodeId, RelationshipId, TreeId};

/// Common surface of all domain events
pub trait DomainEvent {
    /// Stable event type name
    fn event_type(&self) -> &'static str;

    /// Routing subject for event consumers
    fn subject(&self) -> String;
}

/// Node added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAdded {
    /// The node as created, visuals already derived from its type
    pub node: Node,
}

/// Node updated event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdated {
    /// The node after the patch was applied
    pub node: Node,
}

/// Node removed event
///
/// Carries the full cascade so consumers see the removal of the node, its
/// relationships, and its measurements as one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRemoved {
    /// The ID of the node that was removed
    pub node_id: NodeId,
    /// Relationships removed because they named the node as an endpoint
    pub cascaded_relationships: Vec<RelationshipId>,
    /// Measurements removed because the node owned them
    pub cascaded_measurements: Vec<MeasurementId>,
}

/// Relationship added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAdded {
    /// The relationship as created
    pub relationship: Relationship,
}

/// Relationship removed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRemoved {
    /// The ID of the relationship that was removed
    pub relationship_id: RelationshipId,
}

/// Measurement added event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementAdded {
    /// The measurement as created
    pub measurement: Measurement,
}

/// Measurement removed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRemoved {
    /// The ID of the measurement that was removed
    pub measurement_id: MeasurementId,
}

/// Store replaced wholesale by a snapshot import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreImported {
    /// The tree the snapshot belongs to
    pub tree_id: TreeId,
    /// Number of nodes loaded
    pub node_count: usize,
    /// Number of relationships loaded
    pub relationship_count: usize,
    /// Number of measurements loaded
    pub measurement_count: usize,
}

impl DomainEvent for NodeAdded {
    fn event_type(&self) -> &'static str {
        "NodeAdded"
    }

    fn subject(&self) -> String {
        "impact.node.added.v1".to_string()
    }
}

impl DomainEvent for NodeUpdated {
    fn event_type(&self) -> &'static str {
        "NodeUpdated"
    }

    fn subject(&self) -> String {
        "impact.node.updated.v1".to_string()
    }
}

impl DomainEvent for NodeRemoved {
    fn event_type(&self) -> &'static str {
        "NodeRemoved"
    }

    fn subject(&self) -> String {
        "impact.node.removed.v1".to_string()
    }
}

impl DomainEvent for RelationshipAdded {
    fn event_type(&self) -> &'static str {
        "RelationshipAdded"
    }

    fn subject(&self) -> String {
        "impact.relationship.added.v1".to_string()
    }
}

impl DomainEvent for RelationshipRemoved {
    fn event_type(&self) -> &'static str {
        "RelationshipRemoved"
    }

    fn subject(&self) -> String {
        "impact.relationship.removed.v1".to_string()
    }
}

impl DomainEvent for MeasurementAdded {
    fn event_type(&self) -> &'static str {
        "MeasurementAdded"
    }

    fn subject(&self) -> String {
        "impact.measurement.added.v1".to_string()
    }
}

impl DomainEvent for MeasurementRemoved {
    fn event_type(&self) -> &'static str {
        "MeasurementRemoved"
    }

    fn subject(&self) -> String {
        "impact.measurement.removed.v1".to_string()
    }
}

impl DomainEvent for StoreImported {
    fn event_type(&self) -> &'static str {
        "StoreImported"
    }

    fn subject(&self) -> String {
        "impact.store.imported.v1".to_string()
    }
}
