//! Interaction layer
//!
//! The controller reducer, its input/effect vocabulary, and the duplicate
//! creation guard.

pub mod controller;
pub mod duplicate_guard;

pub use controller::{
    DragSession, EditorMode, EditorState, Effect, InputEvent, InteractionConfig, Key, Selection,
};
pub use duplicate_guard::{DuplicateGuard, DuplicateGuardConfig};
