//! Interactive impact-graph editing engine
//!
//! The deterministic core of an impact-tree editor: the canonical graph
//! store, the pointer/keyboard interaction state machine, relationship-type
//! inference, the pan/zoom viewport model, and the auto-pan controller that
//! runs during drag gestures. Rendering, property forms, and persistence are
//! external collaborators that exchange snapshots with this crate and carry
//! no decision logic of their own.

pub mod aggregate;
pub mod autopan;
pub mod domain_events;
pub mod events;
pub mod identifiers;
pub mod inference;
pub mod interaction;
pub mod projections;
pub mod snapshot;
pub mod value_objects;
pub mod viewport;

// Re-export main types
pub use aggregate::{
    GraphStore, ImpactTree, Measurement, MeasurementDraft, Node, NodeDraft, NodePatch,
    NodeRemoval, Relationship, StoreError, ValidationError,
};
pub use domain_events::ImpactGraphEvent;
pub use events::DomainEvent;

// Re-export the interaction surface
pub use interaction::{
    DragSession, EditorMode, EditorState, Effect, InputEvent, InteractionConfig, Key, Selection,
};

// Re-export viewport and auto-pan
pub use autopan::{AutoPanConfig, AutoPanController, PanVelocity};
pub use viewport::{ScreenRect, ViewportModel};

// Re-export inference
pub use inference::{infer, Inference};

// Re-export value objects
pub use value_objects::{Bounds, ImpactType, NodeType, Position2D, RelationshipType, Shape};

// Re-export snapshot exchange types
pub use snapshot::{export, import, GraphSnapshot, SnapshotError};

// Re-export projections
pub use projections::{TreeSummary, TreeSummaryProjection};

// Re-export identifiers
pub use identifiers::{MeasurementId, NodeId, RelationshipId, TreeId};
