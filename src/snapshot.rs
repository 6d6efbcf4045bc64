//! Snapshot import/export
//!
//! The snapshot is the unit exchanged with persistence and export
//! collaborators: tree metadata plus flat lists of nodes, relationships,
//! and measurements. Import replaces the entire store atomically; a
//! malformed document (missing required fields, duplicate ids) rejects the
//! whole load so the store can never be half-populated.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::{GraphStore, ImpactTree, Measurement, Node, Relationship};
use crate::identifiers::{MeasurementId, NodeId, RelationshipId, TreeId};
use crate::value_objects::{ImpactType, NodeType, Position2D, RelationshipType, Shape};

/// Errors raised while loading a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or misses required fields
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two entries share an identifier
    #[error("duplicate {kind} id in snapshot: {id}")]
    DuplicateId { kind: &'static str, id: String },
}

/// Tree metadata as exchanged with collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub id: TreeId,
    pub name: String,
    pub description: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub owner: String,
}

/// A node as exchanged with collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub description: String,
    pub node_type: NodeType,
    pub level: u8,
    pub position_x: f64,
    pub position_y: f64,
    pub color: String,
    pub shape: Shape,
}

/// A relationship as exchanged with collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub id: RelationshipId,
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
    pub relationship_type: RelationshipType,
    pub color: String,
    pub strength: f64,
}

/// A measurement as exchanged with collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSnapshot {
    pub id: MeasurementId,
    pub node_id: NodeId,
    pub metric_name: String,
    pub expected_value: f64,
    pub actual_value: f64,
    pub measurement_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_period: Option<String>,
    pub impact_type: ImpactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// The complete serializable state of one impact tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub tree: TreeSnapshot,
    pub nodes: Vec<NodeSnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
    pub measurements: Vec<MeasurementSnapshot>,
}

impl GraphSnapshot {
    /// Parse a snapshot from JSON; fails wholesale on any structural defect
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Capture the current store and tree metadata as a snapshot
///
/// `updated_date` is refreshed to the time of export.
pub fn export(tree: &ImpactTree, store: &GraphStore) -> GraphSnapshot {
    GraphSnapshot {
        tree: TreeSnapshot {
            id: tree.id,
            name: tree.name.clone(),
            description: tree.description.clone(),
            created_date: tree.created_date,
            updated_date: Utc::now(),
            owner: tree.owner.clone(),
        },
        nodes: store
            .nodes()
            .map(|n| NodeSnapshot {
                id: n.id,
                name: n.name.clone(),
                description: n.description.clone(),
                node_type: n.node_type,
                level: n.tier,
                position_x: n.position.x,
                position_y: n.position.y,
                color: n.color.clone(),
                shape: n.shape,
            })
            .collect(),
        relationships: store
            .relationships()
            .map(|r| RelationshipSnapshot {
                id: r.id,
                source_node_id: r.source_node_id,
                target_node_id: r.target_node_id,
                relationship_type: r.relationship_type,
                color: r.color.clone(),
                strength: r.strength,
            })
            .collect(),
        measurements: store
            .measurements()
            .map(|m| MeasurementSnapshot {
                id: m.id,
                node_id: m.node_id,
                metric_name: m.metric_name.clone(),
                expected_value: m.expected_value,
                actual_value: m.actual_value,
                measurement_date: m.measurement_date,
                measurement_period: m.measurement_period.clone(),
                impact_type: m.impact_type,
                order: m.order,
            })
            .collect(),
    }
}

/// Rebuild tree metadata and a store from a snapshot
///
/// Dangling relationship endpoints are tolerated here; the store's
/// `live_relationships` view filters them for readers, and the mutation API
/// can never add more. Duplicate identifiers reject the whole load.
pub fn import(snapshot: GraphSnapshot) -> Result<(ImpactTree, GraphStore), SnapshotError> {
    let tree = ImpactTree {
        id: snapshot.tree.id,
        name: snapshot.tree.name,
        description: snapshot.tree.description,
        created_date: snapshot.tree.created_date,
        updated_date: snapshot.tree.updated_date,
        owner: snapshot.tree.owner,
    };

    let mut nodes = IndexMap::with_capacity(snapshot.nodes.len());
    for n in snapshot.nodes {
        let node = Node {
            id: n.id,
            name: n.name,
            description: n.description,
            node_type: n.node_type,
            tier: n.level,
            position: Position2D::new(n.position_x, n.position_y),
            color: n.color,
            shape: n.shape,
        };
        if nodes.insert(node.id, node).is_some() {
            return Err(SnapshotError::DuplicateId {
                kind: "node",
                id: n.id.to_string(),
            });
        }
    }

    let mut relationships = IndexMap::with_capacity(snapshot.relationships.len());
    for r in snapshot.relationships {
        let relationship = Relationship {
            id: r.id,
            source_node_id: r.source_node_id,
            target_node_id: r.target_node_id,
            relationship_type: r.relationship_type,
            color: r.color,
            strength: r.strength,
        };
        if relationships.insert(relationship.id, relationship).is_some() {
            return Err(SnapshotError::DuplicateId {
                kind: "relationship",
                id: r.id.to_string(),
            });
        }
    }

    let mut measurements = IndexMap::with_capacity(snapshot.measurements.len());
    for m in snapshot.measurements {
        let id = m.id;
        let measurement = Measurement {
            id: m.id,
            node_id: m.node_id,
            metric_name: m.metric_name,
            expected_value: m.expected_value,
            actual_value: m.actual_value,
            measurement_date: m.measurement_date,
            measurement_period: m.measurement_period,
            impact_type: m.impact_type,
            order: m.order,
        };
        if measurements.insert(id, measurement).is_some() {
            return Err(SnapshotError::DuplicateId {
                kind: "measurement",
                id: id.to_string(),
            });
        }
    }

    tracing::info!(
        tree_id = %tree.id,
        nodes = nodes.len(),
        relationships = relationships.len(),
        measurements = measurements.len(),
        "snapshot imported"
    );
    Ok((tree, GraphStore::from_parts(nodes, relationships, measurements)))
}
