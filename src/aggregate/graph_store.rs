//! Graph store aggregate
//!
//! The store is the canonical owner of all nodes, relationships, and
//! measurements. It enforces referential integrity and cascading deletion.
//!
//! Every mutating operation returns a NEW store value instead of mutating in
//! place. Callers (and the rendering collaborator) detect change by comparing
//! the [`version`](GraphStore::version) of two snapshots; an operation that
//! turns out to be a no-op hands back an identical snapshot with the version
//! unchanged. This keeps the engine replay-friendly and directly testable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::entities::{
    Measurement, MeasurementDraft, Node, NodeDraft, NodePatch, Relationship,
};
use crate::identifiers::{MeasurementId, NodeId, RelationshipId};
use crate::value_objects::{Bounds, RelationshipType};

/// Rejections raised by relationship creation
///
/// All of them leave the store untouched; they are surfaced to the caller
/// for user feedback and are never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// One of the endpoints does not name a live node
    #[error("relationship endpoint {0} does not exist")]
    DanglingEndpoint(NodeId),

    /// Source and target are the same node
    #[error("node {0} cannot be connected to itself")]
    SelfLoop(NodeId),

    /// A live relationship with the same ordered endpoints already exists
    ///
    /// Positional fields: thiserror reserves the name `source` for the
    /// error-cause chain.
    #[error("a relationship from {from} to {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },
}

/// Errors raised by store operations other than relationship creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    /// The referenced node does not exist
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
}

/// Everything removed by one cascading node deletion
///
/// The removal of the node, its relationships, and its measurements is a
/// single observable transition: one old snapshot, one new snapshot, nothing
/// dangling in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRemoval {
    /// The node that was removed
    pub node: Node,
    /// Relationships that named the node as source or target
    pub relationships: Vec<RelationshipId>,
    /// Measurements owned by the node
    pub measurements: Vec<MeasurementId>,
}

/// The canonical graph store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStore {
    version: u64,
    nodes: IndexMap<NodeId, Node>,
    relationships: IndexMap<RelationshipId, Relationship>,
    measurements: IndexMap<MeasurementId, Measurement>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store directly from collections, as an atomic replacement
    ///
    /// Used by snapshot import; the content is taken as-is, so relationships
    /// with dangling endpoints from a hand-edited snapshot survive the load
    /// and are filtered by [`live_relationships`](Self::live_relationships).
    pub(crate) fn from_parts(
        nodes: IndexMap<NodeId, Node>,
        relationships: IndexMap<RelationshipId, Relationship>,
        measurements: IndexMap<MeasurementId, Measurement>,
    ) -> Self {
        Self {
            version: 1,
            nodes,
            relationships,
            measurements,
        }
    }

    /// Snapshot identity; bumped once per accepted mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bumped(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }

    // --- nodes ---

    /// Add a node, deriving tier, color, and shape from its type
    pub fn add_node(&self, draft: NodeDraft) -> (Self, Node) {
        let node = Node {
            id: NodeId::new(),
            name: draft.name,
            description: draft.description,
            node_type: draft.node_type,
            tier: draft.node_type.tier(),
            position: draft.position,
            color: draft
                .color
                .unwrap_or_else(|| draft.node_type.default_color().to_string()),
            shape: draft.shape.unwrap_or_else(|| draft.node_type.default_shape()),
        };
        tracing::debug!(node_id = %node.id, node_type = %node.node_type, "node added");
        let mut next = self.bumped();
        next.nodes.insert(node.id, node.clone());
        (next, node)
    }

    /// Apply a partial update to a node
    ///
    /// A patch that changes the node type re-derives tier, color, and shape;
    /// an explicit color in the same patch wins over the derived default.
    pub fn update_node(&self, id: NodeId, patch: NodePatch) -> Result<(Self, Node), StoreError> {
        let mut node = self
            .nodes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NodeNotFound(id))?;

        if let Some(node_type) = patch.node_type {
            node.node_type = node_type;
            node.tier = node_type.tier();
            node.color = node_type.default_color().to_string();
            node.shape = node_type.default_shape();
        }
        if let Some(name) = patch.name {
            node.name = name;
        }
        if let Some(description) = patch.description {
            node.description = description;
        }
        if let Some(position) = patch.position {
            node.position = position;
        }
        if let Some(color) = patch.color {
            node.color = color;
        }

        let mut next = self.bumped();
        next.nodes.insert(id, node.clone());
        Ok((next, node))
    }

    /// Delete a node and cascade to its relationships and measurements
    ///
    /// Idempotent: deleting an unknown id is a no-op that returns an
    /// unchanged snapshot.
    pub fn delete_node(&self, id: NodeId) -> (Self, Option<NodeRemoval>) {
        let mut next = self.bumped();
        let Some(node) = next.nodes.shift_remove(&id) else {
            return (self.clone(), None);
        };

        let relationships: Vec<RelationshipId> = next
            .relationships
            .values()
            .filter(|r| r.source_node_id == id || r.target_node_id == id)
            .map(|r| r.id)
            .collect();
        for rel_id in &relationships {
            next.relationships.shift_remove(rel_id);
        }

        let measurements: Vec<MeasurementId> = next
            .measurements
            .values()
            .filter(|m| m.node_id == id)
            .map(|m| m.id)
            .collect();
        for m_id in &measurements {
            next.measurements.shift_remove(m_id);
        }

        tracing::debug!(
            node_id = %id,
            cascaded_relationships = relationships.len(),
            cascaded_measurements = measurements.len(),
            "node deleted"
        );
        (
            next,
            Some(NodeRemoval {
                node,
                relationships,
                measurements,
            }),
        )
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Whether a node exists
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Bounding box of all node positions, if any nodes exist
    pub fn node_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.nodes.values().map(|n| n.position))
    }

    // --- relationships ---

    /// Create a relationship after the ordered validation checks
    ///
    /// Checks run in contract order: endpoints exist, then no self-loop,
    /// then no duplicate ordered pair.
    pub fn add_relationship(
        &self,
        source: NodeId,
        target: NodeId,
        relationship_type: RelationshipType,
        color: impl Into<String>,
        strength: f64,
    ) -> Result<(Self, Relationship), ValidationError> {
        if !self.nodes.contains_key(&source) {
            return Err(ValidationError::DanglingEndpoint(source));
        }
        if !self.nodes.contains_key(&target) {
            return Err(ValidationError::DanglingEndpoint(target));
        }
        if source == target {
            return Err(ValidationError::SelfLoop(source));
        }
        if self
            .relationships
            .values()
            .any(|r| r.source_node_id == source && r.target_node_id == target)
        {
            return Err(ValidationError::DuplicateEdge {
                from: source,
                to: target,
            });
        }

        let relationship = Relationship {
            id: RelationshipId::new(),
            source_node_id: source,
            target_node_id: target,
            relationship_type,
            color: color.into(),
            strength,
        };
        tracing::debug!(
            relationship_id = %relationship.id,
            source = %source,
            target = %target,
            relationship_type = %relationship_type,
            "relationship added"
        );
        let mut next = self.bumped();
        next.relationships.insert(relationship.id, relationship.clone());
        Ok((next, relationship))
    }

    /// Delete a relationship; unknown ids are a silent no-op
    pub fn delete_relationship(&self, id: RelationshipId) -> (Self, Option<Relationship>) {
        if !self.relationships.contains_key(&id) {
            return (self.clone(), None);
        }
        let mut next = self.bumped();
        let removed = next.relationships.shift_remove(&id);
        (next, removed)
    }

    /// Look up a relationship
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Number of relationships, including any imported dangling ones
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Iterate over all relationships, including any imported dangling ones
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Relationships whose endpoints both exist
    ///
    /// The mutation API can never create a dangling relationship, but a
    /// hand-edited imported snapshot can carry one; readers that draw or
    /// traverse edges use this view and skip them.
    pub fn live_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values().filter(|r| {
            self.nodes.contains_key(&r.source_node_id) && self.nodes.contains_key(&r.target_node_id)
        })
    }

    // --- measurements ---

    /// Attach a measurement to an existing node
    pub fn add_measurement(
        &self,
        draft: MeasurementDraft,
    ) -> Result<(Self, Measurement), StoreError> {
        if !self.nodes.contains_key(&draft.node_id) {
            return Err(StoreError::NodeNotFound(draft.node_id));
        }
        let measurement = Measurement {
            id: MeasurementId::new(),
            node_id: draft.node_id,
            metric_name: draft.metric_name,
            expected_value: draft.expected_value,
            actual_value: draft.actual_value,
            measurement_date: draft.measurement_date,
            measurement_period: draft.measurement_period,
            impact_type: draft.impact_type,
            order: draft.order,
        };
        let mut next = self.bumped();
        next.measurements.insert(measurement.id, measurement.clone());
        Ok((next, measurement))
    }

    /// Delete a measurement; unknown ids are a silent no-op
    pub fn delete_measurement(&self, id: MeasurementId) -> (Self, Option<Measurement>) {
        if !self.measurements.contains_key(&id) {
            return (self.clone(), None);
        }
        let mut next = self.bumped();
        let removed = next.measurements.shift_remove(&id);
        (next, removed)
    }

    /// Number of measurements
    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    /// Iterate over all measurements
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.values()
    }

    /// Measurements owned by one node
    ///
    /// Explicitly ordered measurements come first, sorted by their display
    /// order; order-less ones follow in insertion order.
    pub fn measurements_for(&self, node_id: NodeId) -> Vec<&Measurement> {
        let mut owned: Vec<&Measurement> = self
            .measurements
            .values()
            .filter(|m| m.node_id == node_id)
            .collect();
        owned.sort_by_key(|m| match m.order {
            Some(order) => (0, order),
            None => (1, 0),
        });
        owned
    }
}
