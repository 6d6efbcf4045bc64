//! Interaction controller
//!
//! A reducer over raw input events. All interaction state (mode, selection,
//! drag session, suppression window) lives in one [`EditorState`] value;
//! handling an event mutates that value and returns the effects a host
//! needs to react to (domain events, selection changes, auto-pan session
//! boundaries, rejected relationships).
//!
//! The drag session is nested inside [`EditorMode::Select`] and the pending
//! connect source inside [`EditorMode::Connect`], so combinations like
//! "dragging while placing a node" cannot be represented at all.

use serde::{Deserialize, Serialize};

use crate::aggregate::{GraphStore, ImpactTree, Node, NodeDraft, NodePatch, ValidationError};
use crate::autopan::{AutoPanConfig, AutoPanController};
use crate::domain_events::ImpactGraphEvent;
use crate::events::{NodeAdded, NodeRemoved, NodeUpdated, RelationshipAdded};
use crate::identifiers::{NodeId, RelationshipId};
use crate::inference;
use crate::interaction::duplicate_guard::{DuplicateGuard, DuplicateGuardConfig};
use crate::value_objects::{NodeType, Position2D};
use crate::viewport::ViewportModel;

/// Half-extents of the node hit target in canvas units
const NODE_HIT_HALF_WIDTH: f64 = 60.0;
const NODE_HIT_HALF_HEIGHT: f64 = 30.0;
/// Maximum distance from an edge segment that still counts as a hit
const EDGE_HIT_DISTANCE: f64 = 6.0;
/// Strength assigned to relationships created through the editor
const DEFAULT_STRENGTH: f64 = 1.0;

/// Keys the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// A printable character key
    Char(char),
    /// The Escape key; cancels any transient mode, drag, or connect source
    Escape,
}

/// Raw input events fed to the reducer
///
/// Pointer positions are in screen space; timestamps are host wall-clock
/// milliseconds and only ever compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer button pressed
    PointerDown { position: Position2D, at_ms: f64 },
    /// Pointer moved
    PointerMove { position: Position2D, at_ms: f64 },
    /// Pointer button released
    PointerUp { position: Position2D, at_ms: f64 },
    /// The click the host synthesizes from a down/up pair
    Click { position: Position2D, at_ms: f64 },
    /// Key pressed; ignored when focus is inside a text input
    KeyDown {
        key: Key,
        in_text_input: bool,
        at_ms: f64,
    },
    /// Toolbar request to start placing a node of the given type
    ChooseNodeType(NodeType),
    /// Toolbar request to enter connect mode
    EnterConnectMode,
    /// Toolbar request to return to select mode
    EnterSelectMode,
    /// One scheduled auto-pan tick with the current pointer position
    AutoPanTick { pointer: Position2D },
}

/// The single selected element, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Node(NodeId),
    Relationship(RelationshipId),
}

/// An active node drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// The node being repositioned
    pub node_id: NodeId,
    /// Last pointer position in canvas space
    pub last_pointer: Position2D,
    /// Whether the pointer has actually moved since the press
    pub moved: bool,
}

/// Top-level edit mode with its nested sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EditorMode {
    /// Default mode: selection and node dragging
    Select { drag: Option<DragSession> },
    /// Next canvas click places a node of the pending type
    AddNode { pending: NodeType },
    /// Relationship creation via two picks or one drag gesture
    Connect { source: Option<NodeId> },
}

impl EditorMode {
    /// Select mode with no active drag
    pub fn select() -> Self {
        EditorMode::Select { drag: None }
    }
}

/// Effects a host must react to after handling an event
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A domain event; the store snapshot has already been replaced
    Domain(ImpactGraphEvent),
    /// The selection changed to the given value
    SelectionChanged(Option<Selection>),
    /// The edit mode changed; re-read [`EditorState::mode`]
    ModeChanged,
    /// A drag session began; schedule auto-pan ticks
    AutoPanStarted,
    /// The drag session ended; cancel the scheduled ticks
    AutoPanStopped,
    /// Relationship creation was rejected; state is unchanged
    RelationshipRejected(ValidationError),
}

/// Tuning for the interaction layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// How long after a real drag the follow-up click is swallowed
    pub click_suppression_ms: f64,
    pub duplicate_guard: DuplicateGuardConfig,
    pub auto_pan: AutoPanConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_suppression_ms: 150.0,
            duplicate_guard: DuplicateGuardConfig::default(),
            auto_pan: AutoPanConfig::default(),
        }
    }
}

/// The complete interactive-editing state
#[derive(Debug, Clone)]
pub struct EditorState {
    tree: ImpactTree,
    store: GraphStore,
    viewport: ViewportModel,
    mode: EditorMode,
    selection: Option<Selection>,
    auto_pan: AutoPanController,
    duplicate_guard: DuplicateGuard,
    suppress_clicks_until_ms: Option<f64>,
    config: InteractionConfig,
}

impl EditorState {
    /// A fresh editor over an empty store
    pub fn new(tree: ImpactTree, viewport: ViewportModel) -> Self {
        Self::with_config(tree, GraphStore::new(), viewport, InteractionConfig::default())
    }

    /// An editor over an existing store with explicit tuning
    pub fn with_config(
        tree: ImpactTree,
        store: GraphStore,
        viewport: ViewportModel,
        config: InteractionConfig,
    ) -> Self {
        Self {
            tree,
            store,
            viewport,
            mode: EditorMode::select(),
            selection: None,
            auto_pan: AutoPanController::new(config.auto_pan),
            duplicate_guard: DuplicateGuard::new(config.duplicate_guard),
            suppress_clicks_until_ms: None,
            config,
        }
    }

    /// Tree metadata
    pub fn tree(&self) -> &ImpactTree {
        &self.tree
    }

    /// Current store snapshot
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Current viewport
    pub fn viewport(&self) -> &ViewportModel {
        &self.viewport
    }

    /// Mutable viewport access for host-driven pan/zoom gestures
    pub fn viewport_mut(&mut self) -> &mut ViewportModel {
        &mut self.viewport
    }

    /// Current edit mode
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Current selection
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Whether a drag session is active
    pub fn is_dragging(&self) -> bool {
        matches!(
            self.mode,
            EditorMode::Select { drag: Some(_) }
        )
    }

    /// Replace the store wholesale, clearing all transient interaction state
    ///
    /// Used by snapshot import; the swap is atomic from the host's point of
    /// view because the previous snapshot stays untouched until this call.
    pub fn replace_store(&mut self, tree: ImpactTree, store: GraphStore) -> Vec<Effect> {
        let mut effects = self.cancel_transient_state();
        self.tree = tree;
        self.store = store;
        if self.selection.take().is_some() {
            effects.push(Effect::SelectionChanged(None));
        }
        effects
    }

    /// Handle one input event
    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown { position, at_ms } => self.on_pointer_down(position, at_ms),
            InputEvent::PointerMove { position, .. } => self.on_pointer_move(position),
            InputEvent::PointerUp { position, at_ms } => self.on_pointer_up(position, at_ms),
            InputEvent::Click { position, at_ms } => self.on_click(position, at_ms),
            InputEvent::KeyDown {
                key,
                in_text_input,
                at_ms,
            } => self.on_key_down(key, in_text_input, at_ms),
            InputEvent::ChooseNodeType(node_type) => self.enter_add_node(node_type),
            InputEvent::EnterConnectMode => self.enter_connect(),
            InputEvent::EnterSelectMode => self.enter_select(),
            InputEvent::AutoPanTick { pointer } => {
                self.auto_pan.tick(pointer, &mut self.viewport);
                Vec::new()
            }
        }
    }

    // --- hit testing ---

    /// Topmost node whose hit box contains the canvas-space point
    pub fn node_at(&self, canvas: Position2D) -> Option<&Node> {
        // Later insertions render on top, so scan in reverse.
        self.store
            .nodes()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|n| {
                (n.position.x - canvas.x).abs() <= NODE_HIT_HALF_WIDTH
                    && (n.position.y - canvas.y).abs() <= NODE_HIT_HALF_HEIGHT
            })
    }

    /// Relationship whose segment passes within the hit distance of the point
    pub fn relationship_at(&self, canvas: Position2D) -> Option<RelationshipId> {
        self.store
            .live_relationships()
            .filter_map(|r| {
                let a = self.store.node(r.source_node_id)?.position;
                let b = self.store.node(r.target_node_id)?.position;
                let d = point_segment_distance(canvas, a, b);
                (d <= EDGE_HIT_DISTANCE).then_some((r.id, d))
            })
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .map(|(id, _)| id)
    }

    // --- pointer events ---

    fn on_pointer_down(&mut self, position: Position2D, _at_ms: f64) -> Vec<Effect> {
        let canvas = self.viewport.screen_to_canvas(position);
        match self.mode {
            EditorMode::Select { drag: None } => {
                if let Some(node) = self.node_at(canvas) {
                    let node_id = node.id;
                    self.mode = EditorMode::Select {
                        drag: Some(DragSession {
                            node_id,
                            last_pointer: canvas,
                            moved: false,
                        }),
                    };
                    self.auto_pan.begin_session();
                    tracing::debug!(node_id = %node_id, "drag session started");
                    return vec![Effect::AutoPanStarted];
                }
                Vec::new()
            }
            EditorMode::Select { drag: Some(_) } => Vec::new(),
            EditorMode::AddNode { .. } => Vec::new(),
            EditorMode::Connect { source } => {
                let Some(node) = self.node_at(canvas) else {
                    return Vec::new();
                };
                let node_id = node.id;
                match source {
                    // Second press on the pending source deselects it.
                    Some(pending) if pending == node_id => {
                        self.mode = EditorMode::Connect { source: None };
                        vec![Effect::ModeChanged]
                    }
                    // Press on another node while a source is pending: the
                    // commit happens on release, nothing to do yet.
                    Some(_) => Vec::new(),
                    None => {
                        self.mode = EditorMode::Connect {
                            source: Some(node_id),
                        };
                        vec![Effect::ModeChanged]
                    }
                }
            }
        }
    }

    fn on_pointer_move(&mut self, position: Position2D) -> Vec<Effect> {
        let EditorMode::Select { drag: Some(session) } = self.mode else {
            return Vec::new();
        };
        let canvas = self.viewport.screen_to_canvas(position);
        let (dx, dy) = canvas.delta_from(&session.last_pointer);
        if dx == 0.0 && dy == 0.0 {
            return Vec::new();
        }
        let Some(current) = self.store.node(session.node_id).map(|n| n.position) else {
            // Node vanished under the drag; tear the session down.
            self.mode = EditorMode::select();
            self.auto_pan.end_session();
            return vec![Effect::AutoPanStopped];
        };
        self.mode = EditorMode::Select {
            drag: Some(DragSession {
                node_id: session.node_id,
                last_pointer: canvas,
                moved: true,
            }),
        };

        let target = Position2D::new(current.x + dx, current.y + dy);
        match self
            .store
            .update_node(session.node_id, NodePatch::position(target))
        {
            Ok((next, node)) => {
                self.store = next;
                vec![Effect::Domain(ImpactGraphEvent::NodeUpdated(NodeUpdated {
                    node,
                }))]
            }
            Err(_) => Vec::new(),
        }
    }

    fn on_pointer_up(&mut self, position: Position2D, at_ms: f64) -> Vec<Effect> {
        match self.mode {
            EditorMode::Select { drag: Some(session) } => {
                self.mode = EditorMode::select();
                self.auto_pan.end_session();
                if session.moved {
                    // The same release will synthesize a click; swallow it so
                    // a reposition does not also change the selection.
                    self.suppress_clicks_until_ms =
                        Some(at_ms + self.config.click_suppression_ms);
                }
                tracing::debug!(node_id = %session.node_id, "drag session ended");
                vec![Effect::AutoPanStopped]
            }
            EditorMode::Connect { source: Some(source) } => {
                let canvas = self.viewport.screen_to_canvas(position);
                let target = self.node_at(canvas).map(|n| n.id);
                match target {
                    Some(target) if target != source => {
                        self.commit_relationship(source, target, at_ms)
                    }
                    // Release over the source or empty canvas keeps the
                    // pending source for the two-click flow.
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn on_click(&mut self, position: Position2D, at_ms: f64) -> Vec<Effect> {
        if let Some(deadline) = self.suppress_clicks_until_ms {
            if at_ms < deadline {
                self.suppress_clicks_until_ms = None;
                tracing::debug!("click suppressed after drag");
                return Vec::new();
            }
            self.suppress_clicks_until_ms = None;
        }

        let canvas = self.viewport.screen_to_canvas(position);
        match self.mode {
            EditorMode::Select { .. } => {
                let next = if let Some(node) = self.node_at(canvas) {
                    Some(Selection::Node(node.id))
                } else {
                    self.relationship_at(canvas).map(Selection::Relationship)
                };
                if next == self.selection {
                    Vec::new()
                } else {
                    self.selection = next;
                    vec![Effect::SelectionChanged(next)]
                }
            }
            EditorMode::AddNode { pending } => self.place_node(pending, canvas, at_ms),
            // Connect-mode picks are handled on the down/up pair.
            EditorMode::Connect { .. } => Vec::new(),
        }
    }

    fn on_key_down(&mut self, key: Key, in_text_input: bool, at_ms: f64) -> Vec<Effect> {
        if in_text_input {
            return Vec::new();
        }
        match key {
            Key::Escape => self.on_escape(at_ms),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'b' => self.enter_add_node(NodeType::BusinessMetric),
                'p' => self.enter_add_node(NodeType::ProductMetric),
                'i' => self.enter_add_node(NodeType::Initiative),
                'c' => self.enter_connect(),
                'v' => self.enter_select(),
                _ => Vec::new(),
            },
        }
    }

    fn on_escape(&mut self, at_ms: f64) -> Vec<Effect> {
        match self.mode {
            EditorMode::Select { drag: Some(session) } => {
                self.mode = EditorMode::select();
                self.auto_pan.end_session();
                if session.moved {
                    self.suppress_clicks_until_ms =
                        Some(at_ms + self.config.click_suppression_ms);
                }
                vec![Effect::AutoPanStopped]
            }
            EditorMode::Select { drag: None } => Vec::new(),
            EditorMode::AddNode { .. } | EditorMode::Connect { .. } => {
                self.mode = EditorMode::select();
                vec![Effect::ModeChanged]
            }
        }
    }

    // --- mode transitions ---

    fn enter_add_node(&mut self, node_type: NodeType) -> Vec<Effect> {
        if self.is_dragging() {
            return Vec::new();
        }
        if self.mode == (EditorMode::AddNode { pending: node_type }) {
            return Vec::new();
        }
        self.mode = EditorMode::AddNode { pending: node_type };
        vec![Effect::ModeChanged]
    }

    fn enter_connect(&mut self) -> Vec<Effect> {
        if self.is_dragging() {
            return Vec::new();
        }
        if matches!(self.mode, EditorMode::Connect { .. }) {
            return Vec::new();
        }
        self.mode = EditorMode::Connect { source: None };
        vec![Effect::ModeChanged]
    }

    fn enter_select(&mut self) -> Vec<Effect> {
        if self.mode == EditorMode::select() {
            return Vec::new();
        }
        let mut effects = self.cancel_transient_state();
        effects.push(Effect::ModeChanged);
        effects
    }

    /// Drop any drag, pending type, or connect source and return to Select
    fn cancel_transient_state(&mut self) -> Vec<Effect> {
        let was_dragging = self.is_dragging();
        self.mode = EditorMode::select();
        if was_dragging {
            self.auto_pan.end_session();
            vec![Effect::AutoPanStopped]
        } else {
            Vec::new()
        }
    }

    // --- mutations ---

    fn place_node(&mut self, pending: NodeType, canvas: Position2D, at_ms: f64) -> Vec<Effect> {
        if !self.duplicate_guard.admit(canvas, pending, at_ms) {
            return Vec::new();
        }
        let draft = NodeDraft::new(default_node_name(pending), pending, canvas);
        let (next, node) = self.store.add_node(draft);
        self.store = next;
        self.mode = EditorMode::select();
        self.selection = Some(Selection::Node(node.id));
        vec![
            Effect::Domain(ImpactGraphEvent::NodeAdded(NodeAdded { node })),
            Effect::SelectionChanged(self.selection),
            Effect::ModeChanged,
        ]
    }

    fn commit_relationship(&mut self, source: NodeId, target: NodeId, at_ms: f64) -> Vec<Effect> {
        let Some(source_node) = self.store.node(source) else {
            // The pending source vanished; drop it and stay in connect mode.
            self.mode = EditorMode::Connect { source: None };
            return vec![Effect::ModeChanged];
        };
        let inferred = inference::infer(source_node);
        match self.store.add_relationship(
            source,
            target,
            inferred.relationship_type,
            inferred.color,
            DEFAULT_STRENGTH,
        ) {
            Ok((next, relationship)) => {
                self.store = next;
                self.mode = EditorMode::select();
                // The same release synthesizes a click that would land in
                // Select mode and grab the target; swallow it so a commit
                // changes nothing but the relationship set.
                self.suppress_clicks_until_ms = Some(at_ms + self.config.click_suppression_ms);
                vec![
                    Effect::Domain(ImpactGraphEvent::RelationshipAdded(RelationshipAdded {
                        relationship,
                    })),
                    Effect::ModeChanged,
                ]
            }
            Err(err) => {
                tracing::debug!(%err, "relationship rejected");
                vec![Effect::RelationshipRejected(err)]
            }
        }
    }

    /// Delete a node (host request, e.g. from a properties panel)
    pub fn delete_node(&mut self, node_id: NodeId) -> Vec<Effect> {
        let (next, removal) = self.store.delete_node(node_id);
        self.store = next;
        let Some(removal) = removal else {
            return Vec::new();
        };
        let mut effects = Vec::new();
        if self.selection_references_removal(&removal.node.id, &removal.relationships) {
            self.selection = None;
            effects.push(Effect::SelectionChanged(None));
        }
        effects.push(Effect::Domain(ImpactGraphEvent::NodeRemoved(NodeRemoved {
            node_id: removal.node.id,
            cascaded_relationships: removal.relationships,
            cascaded_measurements: removal.measurements,
        })));
        effects
    }

    fn selection_references_removal(
        &self,
        node_id: &NodeId,
        relationships: &[RelationshipId],
    ) -> bool {
        match self.selection {
            Some(Selection::Node(id)) => id == *node_id,
            Some(Selection::Relationship(id)) => relationships.contains(&id),
            None => false,
        }
    }
}

/// Default display name for a freshly placed node
fn default_node_name(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::BusinessMetric => "New Business Metric",
        NodeType::ProductMetric => "New Product Metric",
        NodeType::Initiative => "New Initiative",
    }
}

/// Distance from a point to the segment `a..b`
fn point_segment_distance(p: Position2D, a: Position2D, b: Position2D) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    let closest = Position2D::new(a.x + t * abx, a.y + t * aby);
    p.distance_to(&closest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RelationshipType;

    fn editor() -> EditorState {
        EditorState::new(
            ImpactTree::new("Growth", "Q3 growth model", "pm@example.com"),
            ViewportModel::new(800.0, 600.0),
        )
    }

    fn click(state: &mut EditorState, x: f64, y: f64, at_ms: f64) -> Vec<Effect> {
        let position = Position2D::new(x, y);
        state.handle(InputEvent::PointerDown { position, at_ms });
        let mut effects = state.handle(InputEvent::PointerUp { position, at_ms });
        effects.extend(state.handle(InputEvent::Click { position, at_ms }));
        effects
    }

    fn place(state: &mut EditorState, node_type: NodeType, x: f64, y: f64, at_ms: f64) -> NodeId {
        state.handle(InputEvent::ChooseNodeType(node_type));
        let effects = click(state, x, y, at_ms);
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Domain(ImpactGraphEvent::NodeAdded(added)) => Some(added.node.id),
                _ => None,
            })
            .expect("node should be placed")
    }

    #[test]
    fn add_node_click_places_selects_and_returns_to_select() {
        let mut state = editor();
        state.handle(InputEvent::ChooseNodeType(NodeType::BusinessMetric));
        assert!(matches!(state.mode(), EditorMode::AddNode { .. }));

        let effects = click(&mut state, 400.0, 100.0, 0.0);
        assert_eq!(state.store().node_count(), 1);
        assert_eq!(state.mode(), EditorMode::select());
        let node = state.store().nodes().next().unwrap();
        assert_eq!(state.selection(), Some(Selection::Node(node.id)));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::SelectionChanged(Some(_)))));
    }

    #[test]
    fn duplicate_fire_places_one_node() {
        let mut state = editor();
        state.handle(InputEvent::ChooseNodeType(NodeType::Initiative));
        click(&mut state, 100.0, 200.0, 1000.0);
        // Second fire lands back in AddNode first.
        state.handle(InputEvent::ChooseNodeType(NodeType::Initiative));
        click(&mut state, 101.0, 201.0, 1400.0);
        assert_eq!(state.store().node_count(), 1);
    }

    #[test]
    fn escape_discards_pending_type() {
        let mut state = editor();
        state.handle(InputEvent::ChooseNodeType(NodeType::ProductMetric));
        state.handle(InputEvent::KeyDown {
            key: Key::Escape,
            in_text_input: false,
            at_ms: 0.0,
        });
        assert_eq!(state.mode(), EditorMode::select());
        click(&mut state, 50.0, 50.0, 10.0);
        assert_eq!(state.store().node_count(), 0);
    }

    #[test]
    fn two_click_connect_creates_inferred_relationship() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 400.0, 100.0, 0.0);
        let b = place(&mut state, NodeType::ProductMetric, 200.0, 250.0, 1000.0);

        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 400.0, 100.0, 2000.0);
        assert_eq!(state.mode(), EditorMode::Connect { source: Some(a) });
        click(&mut state, 200.0, 250.0, 2200.0);

        assert_eq!(state.store().relationship_count(), 1);
        let rel = state.store().relationships().next().unwrap();
        assert_eq!(rel.source_node_id, a);
        assert_eq!(rel.target_node_id, b);
        assert_eq!(rel.relationship_type, RelationshipType::DesirableEffect);
        assert_eq!(rel.color, crate::inference::TIER1_COLOR);
        assert_eq!(state.mode(), EditorMode::select());
    }

    #[test]
    fn connect_commit_leaves_selection_unchanged() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 400.0, 100.0, 0.0);
        place(&mut state, NodeType::ProductMetric, 200.0, 250.0, 1000.0);
        click(&mut state, 700.0, 550.0, 1500.0);
        assert_eq!(state.selection(), None);

        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 400.0, 100.0, 2000.0);
        // The commit fires on release; the click the host synthesizes from
        // that same release must not grab the target node.
        click(&mut state, 200.0, 250.0, 2200.0);

        assert_eq!(state.store().relationship_count(), 1);
        assert_eq!(state.selection(), None);

        // The window is spent; a later click selects normally again.
        let effects = click(&mut state, 200.0, 250.0, 3000.0);
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::SelectionChanged(Some(_)))));
    }

    #[test]
    fn drag_to_connect_commit_suppresses_the_release_click() {
        let mut state = editor();
        place(&mut state, NodeType::Initiative, 100.0, 100.0, 0.0);
        place(&mut state, NodeType::ProductMetric, 500.0, 400.0, 1000.0);
        click(&mut state, 700.0, 550.0, 1500.0);
        assert_eq!(state.selection(), None);

        state.handle(InputEvent::EnterConnectMode);
        state.handle(InputEvent::PointerDown {
            position: Position2D::new(100.0, 100.0),
            at_ms: 2000.0,
        });
        state.handle(InputEvent::PointerUp {
            position: Position2D::new(500.0, 400.0),
            at_ms: 2100.0,
        });
        state.handle(InputEvent::Click {
            position: Position2D::new(500.0, 400.0),
            at_ms: 2100.0,
        });

        assert_eq!(state.store().relationship_count(), 1);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn clicking_pending_source_again_deselects_it() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 400.0, 100.0, 0.0);
        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 400.0, 100.0, 1000.0);
        assert_eq!(state.mode(), EditorMode::Connect { source: Some(a) });
        click(&mut state, 400.0, 100.0, 1200.0);
        assert_eq!(state.mode(), EditorMode::Connect { source: None });
    }

    #[test]
    fn drag_to_connect_commits_on_release() {
        let mut state = editor();
        let a = place(&mut state, NodeType::Initiative, 100.0, 100.0, 0.0);
        let b = place(&mut state, NodeType::ProductMetric, 500.0, 400.0, 1000.0);

        state.handle(InputEvent::EnterConnectMode);
        state.handle(InputEvent::PointerDown {
            position: Position2D::new(100.0, 100.0),
            at_ms: 2000.0,
        });
        state.handle(InputEvent::PointerMove {
            position: Position2D::new(300.0, 250.0),
            at_ms: 2050.0,
        });
        state.handle(InputEvent::PointerUp {
            position: Position2D::new(500.0, 400.0),
            at_ms: 2100.0,
        });

        assert_eq!(state.store().relationship_count(), 1);
        let rel = state.store().relationships().next().unwrap();
        assert_eq!((rel.source_node_id, rel.target_node_id), (a, b));
        // Tier-3 source rolls up and propagates its own color.
        assert_eq!(rel.relationship_type, RelationshipType::Rollup);
    }

    #[test]
    fn failed_connect_keeps_pending_source() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 100.0, 100.0, 0.0);
        let _b = place(&mut state, NodeType::ProductMetric, 500.0, 400.0, 1000.0);

        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 100.0, 100.0, 2000.0);
        click(&mut state, 500.0, 400.0, 2100.0);
        assert_eq!(state.store().relationship_count(), 1);

        // Same pair again: DuplicateEdge, source stays pending.
        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 100.0, 100.0, 3000.0);
        let effects = click(&mut state, 500.0, 400.0, 3100.0);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::RelationshipRejected(ValidationError::DuplicateEdge { .. })
        )));
        assert_eq!(state.mode(), EditorMode::Connect { source: Some(a) });
        assert_eq!(state.store().relationship_count(), 1);
    }

    #[test]
    fn drag_moves_node_by_pointer_delta() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);

        state.handle(InputEvent::PointerDown {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1000.0,
        });
        assert!(state.is_dragging());
        state.handle(InputEvent::PointerMove {
            position: Position2D::new(250.0, 180.0),
            at_ms: 1016.0,
        });
        state.handle(InputEvent::PointerUp {
            position: Position2D::new(250.0, 180.0),
            at_ms: 1032.0,
        });

        let node = state.store().node(a).unwrap();
        assert_eq!(node.position, Position2D::new(250.0, 180.0));
        assert!(!state.is_dragging());
    }

    #[test]
    fn drag_start_and_stop_emit_auto_pan_effects_once() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);

        let down = state.handle(InputEvent::PointerDown {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1000.0,
        });
        assert_eq!(down, vec![Effect::AutoPanStarted]);
        let up = state.handle(InputEvent::PointerUp {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1100.0,
        });
        assert_eq!(up, vec![Effect::AutoPanStopped]);
    }

    #[test]
    fn click_right_after_drag_is_suppressed() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);
        // Select something else first so a selection change would be visible.
        click(&mut state, 600.0, 500.0, 500.0);
        assert_eq!(state.selection(), None);

        state.handle(InputEvent::PointerDown {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1000.0,
        });
        state.handle(InputEvent::PointerMove {
            position: Position2D::new(260.0, 200.0),
            at_ms: 1016.0,
        });
        state.handle(InputEvent::PointerUp {
            position: Position2D::new(260.0, 200.0),
            at_ms: 1032.0,
        });
        let effects = state.handle(InputEvent::Click {
            position: Position2D::new(260.0, 200.0),
            at_ms: 1100.0,
        });
        assert!(effects.is_empty());

        // A later click is back to normal.
        let effects = state.handle(InputEvent::Click {
            position: Position2D::new(260.0, 200.0),
            at_ms: 1300.0,
        });
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::SelectionChanged(Some(_)))));
    }

    #[test]
    fn plain_click_still_selects_without_drag_movement() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);
        click(&mut state, 600.0, 500.0, 500.0);
        // Down and up with no movement: no suppression, selection works.
        let effects = click(&mut state, 200.0, 200.0, 1000.0);
        assert!(effects
            .iter()
            .any(|e| *e == Effect::SelectionChanged(Some(Selection::Node(a)))));
    }

    #[test]
    fn empty_canvas_click_clears_selection() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);
        assert_eq!(state.selection(), Some(Selection::Node(a)));
        let effects = click(&mut state, 700.0, 550.0, 1000.0);
        assert!(effects.contains(&Effect::SelectionChanged(None)));
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn keyboard_shortcuts_switch_modes_unless_typing() {
        let mut state = editor();
        state.handle(InputEvent::KeyDown {
            key: Key::Char('c'),
            in_text_input: false,
            at_ms: 0.0,
        });
        assert_eq!(state.mode(), EditorMode::Connect { source: None });
        state.handle(InputEvent::KeyDown {
            key: Key::Char('v'),
            in_text_input: false,
            at_ms: 10.0,
        });
        assert_eq!(state.mode(), EditorMode::select());
        state.handle(InputEvent::KeyDown {
            key: Key::Char('b'),
            in_text_input: true,
            at_ms: 20.0,
        });
        assert_eq!(state.mode(), EditorMode::select());
        state.handle(InputEvent::KeyDown {
            key: Key::Char('B'),
            in_text_input: false,
            at_ms: 30.0,
        });
        assert_eq!(
            state.mode(),
            EditorMode::AddNode {
                pending: NodeType::BusinessMetric
            }
        );
    }

    #[test]
    fn escape_cancels_connect_source() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);
        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 200.0, 200.0, 1000.0);
        assert!(matches!(state.mode(), EditorMode::Connect { source: Some(_) }));
        state.handle(InputEvent::KeyDown {
            key: Key::Escape,
            in_text_input: false,
            at_ms: 1100.0,
        });
        assert_eq!(state.mode(), EditorMode::select());
    }

    #[test]
    fn escape_ends_drag_and_auto_pan() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);
        state.handle(InputEvent::PointerDown {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1000.0,
        });
        let effects = state.handle(InputEvent::KeyDown {
            key: Key::Escape,
            in_text_input: false,
            at_ms: 1050.0,
        });
        assert!(!state.is_dragging());
        assert_eq!(effects, vec![Effect::AutoPanStopped]);
    }

    #[test]
    fn deleting_selected_node_clears_selection_and_cascades() {
        let mut state = editor();
        let a = place(&mut state, NodeType::BusinessMetric, 400.0, 100.0, 0.0);
        let b = place(&mut state, NodeType::ProductMetric, 200.0, 250.0, 1000.0);
        state.handle(InputEvent::EnterConnectMode);
        click(&mut state, 400.0, 100.0, 2000.0);
        click(&mut state, 200.0, 250.0, 2200.0);
        click(&mut state, 400.0, 100.0, 3000.0);
        assert_eq!(state.selection(), Some(Selection::Node(a)));

        let effects = state.delete_node(a);
        assert!(effects.contains(&Effect::SelectionChanged(None)));
        assert_eq!(state.store().node_count(), 1);
        assert_eq!(state.store().relationship_count(), 0);
        assert!(state.store().contains_node(b));
    }

    #[test]
    fn auto_pan_tick_pans_only_while_dragging() {
        let mut state = editor();
        place(&mut state, NodeType::BusinessMetric, 200.0, 200.0, 0.0);

        state.handle(InputEvent::AutoPanTick {
            pointer: Position2D::new(0.0, 300.0),
        });
        assert_eq!(state.viewport().x, 0.0);

        state.handle(InputEvent::PointerDown {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1000.0,
        });
        state.handle(InputEvent::AutoPanTick {
            pointer: Position2D::new(0.0, 300.0),
        });
        assert_eq!(state.viewport().x, -10.0);

        state.handle(InputEvent::PointerUp {
            position: Position2D::new(200.0, 200.0),
            at_ms: 1100.0,
        });
        state.handle(InputEvent::AutoPanTick {
            pointer: Position2D::new(0.0, 300.0),
        });
        assert_eq!(state.viewport().x, -10.0);
    }
}
