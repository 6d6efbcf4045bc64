//! Impact graph entities
//!
//! Entities are identity-bearing records owned exclusively by the
//! [`GraphStore`](crate::aggregate::GraphStore). Outside the store they are
//! only ever referenced by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{MeasurementId, NodeId, RelationshipId, TreeId};
use crate::value_objects::{ImpactType, NodeType, Position2D, RelationshipType, Shape};

/// Metadata for an impact tree
///
/// Carries no structural invariants beyond uniqueness of its id; the graph
/// structure itself lives in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactTree {
    /// Unique identifier of the tree
    pub id: TreeId,
    /// Human-readable name
    pub name: String,
    /// Description of the tree's purpose
    pub description: String,
    /// When the tree was created
    pub created_date: DateTime<Utc>,
    /// When the tree was last exported or modified
    pub updated_date: DateTime<Utc>,
    /// Owner of the tree
    pub owner: String,
}

impl ImpactTree {
    /// Create a new tree with fresh timestamps
    pub fn new(name: impl Into<String>, description: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TreeId::new(),
            name: name.into(),
            description: description.into(),
            created_date: now,
            updated_date: now,
            owner: owner.into(),
        }
    }
}

/// A node in the impact graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier of the node
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Longer description
    pub description: String,
    /// The kind of node
    pub node_type: NodeType,
    /// Tier in the impact hierarchy, derived from the node type
    pub tier: u8,
    /// Position in canvas space
    pub position: Position2D,
    /// Fill color as a CSS hex string
    pub color: String,
    /// Render shape, derived from the node type
    pub shape: Shape,
}

/// Fields supplied when creating a node
///
/// Tier, color, and shape are derived from the node type unless the draft
/// overrides them.
#[derive(Debug, Clone)]
pub struct NodeDraft {
    pub name: String,
    pub description: String,
    pub node_type: NodeType,
    pub position: Position2D,
    pub color: Option<String>,
    pub shape: Option<Shape>,
}

impl NodeDraft {
    /// A draft with the given name, type, and position
    pub fn new(name: impl Into<String>, node_type: NodeType, position: Position2D) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            node_type,
            position,
            color: None,
            shape: None,
        }
    }
}

/// A partial update to a node
///
/// Absent fields are left untouched. A patch that changes the node type also
/// re-derives tier, color, and shape, unless the patch sets them explicitly.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub node_type: Option<NodeType>,
    pub position: Option<Position2D>,
    pub color: Option<String>,
}

impl NodePatch {
    /// A patch that only moves the node
    pub fn position(position: Position2D) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

/// A typed relationship between two nodes
///
/// Immutable after creation except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier of the relationship
    pub id: RelationshipId,
    /// The cause node
    pub source_node_id: NodeId,
    /// The effect node
    pub target_node_id: NodeId,
    /// The kind of relationship
    pub relationship_type: RelationshipType,
    /// Stroke color as a CSS hex string
    pub color: String,
    /// Strength of the effect, semantically 0-1 but recorded verbatim
    pub strength: f64,
}

/// A measurement attached to a node
///
/// Immutable after creation except for deletion; owned exclusively by its
/// node and removed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique identifier of the measurement
    pub id: MeasurementId,
    /// The node this measurement belongs to
    pub node_id: NodeId,
    /// Name of the metric being measured
    pub metric_name: String,
    /// The value the metric was expected to reach
    pub expected_value: f64,
    /// The value the metric actually reached
    pub actual_value: f64,
    /// When the measurement was taken
    pub measurement_date: DateTime<Utc>,
    /// Optional period label (e.g. "Q3 2026")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_period: Option<String>,
    /// Whether this is a proximate or downstream measurement
    pub impact_type: ImpactType,
    /// Optional display order among the node's measurements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// Fields supplied when creating a measurement
#[derive(Debug, Clone)]
pub struct MeasurementDraft {
    pub node_id: NodeId,
    pub metric_name: String,
    pub expected_value: f64,
    pub actual_value: f64,
    pub measurement_date: DateTime<Utc>,
    pub measurement_period: Option<String>,
    pub impact_type: ImpactType,
    pub order: Option<u32>,
}

impl MeasurementDraft {
    /// A proximate measurement taken now
    pub fn new(node_id: NodeId, metric_name: impl Into<String>, expected: f64, actual: f64) -> Self {
        Self {
            node_id,
            metric_name: metric_name.into(),
            expected_value: expected,
            actual_value: actual,
            measurement_date: Utc::now(),
            measurement_period: None,
            impact_type: ImpactType::Proximate,
            order: None,
        }
    }
}
