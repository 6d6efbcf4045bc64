//! Relationship type inference
//!
//! The nature of an edge is a property of the cause node's tier, not of the
//! pair, so inference never consults the target node.

use serde::{Deserialize, Serialize};

use crate::aggregate::Node;
use crate::value_objects::RelationshipType;

/// Color for relationships whose source is a tier-1 business metric
pub const TIER1_COLOR: &str = "#22c55e";
/// Color for relationships whose source is a tier-2 product metric
pub const TIER2_COLOR: &str = "#3b82f6";
/// Fallback color for sources outside the known tiers
pub const FALLBACK_COLOR: &str = "#9ca3af";

/// The result of inferring a relationship from its source node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inference {
    /// The inferred relationship type
    pub relationship_type: RelationshipType,
    /// The stroke color the relationship should be drawn with
    pub color: String,
}

/// Infer the relationship type and color for an edge leaving `source`
///
/// Total over all nodes: tiers 1 and 2 produce desirable effects in fixed
/// colors, tier 3 rolls up and propagates the source node's own color, and
/// anything else degrades to a gray desirable effect.
pub fn infer(source: &Node) -> Inference {
    match source.tier {
        1 => Inference {
            relationship_type: RelationshipType::DesirableEffect,
            color: TIER1_COLOR.to_string(),
        },
        2 => Inference {
            relationship_type: RelationshipType::DesirableEffect,
            color: TIER2_COLOR.to_string(),
        },
        3 => Inference {
            relationship_type: RelationshipType::Rollup,
            color: source.color.clone(),
        },
        _ => Inference {
            relationship_type: RelationshipType::DesirableEffect,
            color: FALLBACK_COLOR.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GraphStore, NodeDraft};
    use crate::value_objects::{NodeType, Position2D};

    fn node_of(node_type: NodeType) -> Node {
        let (store, node) = GraphStore::new().add_node(NodeDraft::new(
            "n",
            node_type,
            Position2D::default(),
        ));
        store.node(node.id).cloned().unwrap()
    }

    #[test]
    fn tier1_is_green_desirable_effect() {
        let result = infer(&node_of(NodeType::BusinessMetric));
        assert_eq!(result.relationship_type, RelationshipType::DesirableEffect);
        assert_eq!(result.color, TIER1_COLOR);
    }

    #[test]
    fn tier2_is_blue_desirable_effect() {
        let result = infer(&node_of(NodeType::ProductMetric));
        assert_eq!(result.relationship_type, RelationshipType::DesirableEffect);
        assert_eq!(result.color, TIER2_COLOR);
    }

    #[test]
    fn tier3_rolls_up_and_propagates_node_color() {
        let mut node = node_of(NodeType::Initiative);
        node.color = "#123456".to_string();
        let result = infer(&node);
        assert_eq!(result.relationship_type, RelationshipType::Rollup);
        assert_eq!(result.color, "#123456");
    }

    #[test]
    fn unknown_tier_falls_back_to_gray() {
        let mut node = node_of(NodeType::BusinessMetric);
        node.tier = 9;
        let result = infer(&node);
        assert_eq!(result.relationship_type, RelationshipType::DesirableEffect);
        assert_eq!(result.color, FALLBACK_COLOR);
    }

    #[test]
    fn inference_ignores_every_other_field() {
        let mut node = node_of(NodeType::BusinessMetric);
        node.name = "renamed".to_string();
        node.color = "#000000".to_string();
        node.position = Position2D::new(-999.0, 999.0);
        let result = infer(&node);
        assert_eq!(result.relationship_type, RelationshipType::DesirableEffect);
        assert_eq!(result.color, TIER1_COLOR);
    }
}
