//! Tree summary projection
//!
//! A lightweight read model fed by domain events: entity counts and a
//! per-type node tally, for toolbars and list views that should not walk
//! the whole store on every frame.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aggregate::GraphStore;
use crate::domain_events::ImpactGraphEvent;
use crate::identifiers::{MeasurementId, NodeId, RelationshipId};
use crate::value_objects::NodeType;

/// Summary information about the current tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeSummary {
    /// Current number of nodes
    pub node_count: usize,
    /// Current number of relationships
    pub relationship_count: usize,
    /// Current number of measurements
    pub measurement_count: usize,
    /// Node tally per type
    pub nodes_by_type: IndexMap<NodeType, usize>,
}

/// Projection that maintains a [`TreeSummary`] from events
#[derive(Debug, Clone, Default)]
pub struct TreeSummaryProjection {
    node_types: IndexMap<NodeId, NodeType>,
    relationships: Vec<RelationshipId>,
    measurements: Vec<MeasurementId>,
}

impl TreeSummaryProjection {
    /// An empty projection
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a store snapshot, e.g. after an import
    pub fn rebuild_from(store: &GraphStore) -> Self {
        Self {
            node_types: store.nodes().map(|n| (n.id, n.node_type)).collect(),
            relationships: store.relationships().map(|r| r.id).collect(),
            measurements: store.measurements().map(|m| m.id).collect(),
        }
    }

    /// Fold one domain event into the projection
    pub fn apply(&mut self, event: &ImpactGraphEvent) {
        match event {
            ImpactGraphEvent::NodeAdded(e) => {
                self.node_types.insert(e.node.id, e.node.node_type);
            }
            ImpactGraphEvent::NodeUpdated(e) => {
                self.node_types.insert(e.node.id, e.node.node_type);
            }
            ImpactGraphEvent::NodeRemoved(e) => {
                self.node_types.shift_remove(&e.node_id);
                self.relationships
                    .retain(|id| !e.cascaded_relationships.contains(id));
                self.measurements
                    .retain(|id| !e.cascaded_measurements.contains(id));
            }
            ImpactGraphEvent::RelationshipAdded(e) => {
                self.relationships.push(e.relationship.id);
            }
            ImpactGraphEvent::RelationshipRemoved(e) => {
                self.relationships.retain(|id| *id != e.relationship_id);
            }
            ImpactGraphEvent::MeasurementAdded(e) => {
                self.measurements.push(e.measurement.id);
            }
            ImpactGraphEvent::MeasurementRemoved(e) => {
                self.measurements.retain(|id| *id != e.measurement_id);
            }
            // The import event only carries counts; callers rebuild instead.
            ImpactGraphEvent::StoreImported(_) => {}
        }
    }

    /// The current summary
    pub fn summary(&self) -> TreeSummary {
        let mut nodes_by_type: IndexMap<NodeType, usize> = IndexMap::new();
        for node_type in self.node_types.values() {
            *nodes_by_type.entry(*node_type).or_insert(0) += 1;
        }
        TreeSummary {
            node_count: self.node_types.len(),
            relationship_count: self.relationships.len(),
            measurement_count: self.measurements.len(),
            nodes_by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ImpactTree, NodeDraft};
    use crate::interaction::{EditorState, Effect, InputEvent};
    use crate::value_objects::Position2D;
    use crate::viewport::ViewportModel;

    fn fold(projection: &mut TreeSummaryProjection, effects: &[Effect]) {
        for effect in effects {
            if let Effect::Domain(event) = effect {
                projection.apply(event);
            }
        }
    }

    #[test]
    fn projection_tracks_editor_effects() {
        let mut projection = TreeSummaryProjection::new();
        let mut state = EditorState::new(
            ImpactTree::new("t", "", "owner"),
            ViewportModel::new(800.0, 600.0),
        );

        state.handle(InputEvent::ChooseNodeType(NodeType::BusinessMetric));
        let effects = state.handle(InputEvent::Click {
            position: Position2D::new(400.0, 100.0),
            at_ms: 0.0,
        });
        fold(&mut projection, &effects);

        state.handle(InputEvent::ChooseNodeType(NodeType::ProductMetric));
        let effects = state.handle(InputEvent::Click {
            position: Position2D::new(200.0, 250.0),
            at_ms: 1000.0,
        });
        fold(&mut projection, &effects);

        let summary = projection.summary();
        assert_eq!(summary.node_count, 2);
        assert_eq!(summary.nodes_by_type[&NodeType::BusinessMetric], 1);
        assert_eq!(summary.nodes_by_type[&NodeType::ProductMetric], 1);
    }

    #[test]
    fn cascade_removal_updates_all_tallies() {
        let mut projection = TreeSummaryProjection::new();
        let mut state = EditorState::new(
            ImpactTree::new("t", "", "owner"),
            ViewportModel::new(800.0, 600.0),
        );
        state.handle(InputEvent::ChooseNodeType(NodeType::BusinessMetric));
        let e1 = state.handle(InputEvent::Click {
            position: Position2D::new(400.0, 100.0),
            at_ms: 0.0,
        });
        state.handle(InputEvent::ChooseNodeType(NodeType::ProductMetric));
        let e2 = state.handle(InputEvent::Click {
            position: Position2D::new(200.0, 250.0),
            at_ms: 1000.0,
        });
        fold(&mut projection, &e1);
        fold(&mut projection, &e2);

        let a = projection.node_types.keys().next().copied().unwrap();
        let b = projection.node_types.keys().nth(1).copied().unwrap();
        let (store, rel) = state
            .store()
            .add_relationship(
                a,
                b,
                crate::value_objects::RelationshipType::DesirableEffect,
                "#22c55e",
                1.0,
            )
            .unwrap();
        projection.apply(&ImpactGraphEvent::RelationshipAdded(
            crate::events::RelationshipAdded { relationship: rel },
        ));
        assert_eq!(projection.summary().relationship_count, 1);

        let (_, removal) = store.delete_node(a);
        let removal = removal.unwrap();
        projection.apply(&ImpactGraphEvent::NodeRemoved(crate::events::NodeRemoved {
            node_id: a,
            cascaded_relationships: removal.relationships,
            cascaded_measurements: removal.measurements,
        }));

        let summary = projection.summary();
        assert_eq!(summary.node_count, 1);
        assert_eq!(summary.relationship_count, 0);
    }

    #[test]
    fn rebuild_matches_store() {
        let store = GraphStore::new();
        let (store, _) = store.add_node(NodeDraft::new(
            "n",
            NodeType::Initiative,
            Position2D::default(),
        ));
        let projection = TreeSummaryProjection::rebuild_from(&store);
        assert_eq!(projection.summary().node_count, 1);
        assert_eq!(projection.summary().nodes_by_type[&NodeType::Initiative], 1);
    }
}
