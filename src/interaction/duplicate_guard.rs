//! Duplicate creation guard
//!
//! Pointer input occasionally double-fires, which would drop two nodes at
//! effectively the same spot and instant. The guard remembers the last
//! accepted creation request and rejects a new one that arrives within a
//! short window at nearly the same position with the same type.

use crate::value_objects::{NodeType, Position2D};

/// Tuning for the duplicate window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuplicateGuardConfig {
    /// Requests closer in time than this are duplicate candidates
    pub window_ms: f64,
    /// Per-axis position tolerance in canvas units
    pub tolerance: f64,
}

impl Default for DuplicateGuardConfig {
    fn default() -> Self {
        Self {
            window_ms: 500.0,
            tolerance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CreationRequest {
    position: Position2D,
    node_type: NodeType,
    at_ms: f64,
}

/// Short-window filter over node-creation requests
#[derive(Debug, Clone, Default)]
pub struct DuplicateGuard {
    config: DuplicateGuardConfig,
    last_accepted: Option<CreationRequest>,
}

impl DuplicateGuard {
    /// Create a guard with the given tuning
    pub fn new(config: DuplicateGuardConfig) -> Self {
        Self {
            config,
            last_accepted: None,
        }
    }

    /// Decide whether a creation request goes through
    ///
    /// Rejects only when ALL hold against the last accepted request: elapsed
    /// time under the window, both axis deltas under the tolerance, and the
    /// same node type. Accepting replaces the remembered request.
    pub fn admit(&mut self, position: Position2D, node_type: NodeType, at_ms: f64) -> bool {
        if let Some(last) = self.last_accepted {
            let elapsed = at_ms - last.at_ms;
            let duplicate = elapsed < self.config.window_ms
                && (position.x - last.position.x).abs() < self.config.tolerance
                && (position.y - last.position.y).abs() < self.config.tolerance
                && node_type == last.node_type;
            if duplicate {
                tracing::debug!(
                    elapsed_ms = elapsed,
                    node_type = %node_type,
                    "duplicate node creation suppressed"
                );
                return false;
            }
        }
        self.last_accepted = Some(CreationRequest {
            position,
            node_type,
            at_ms,
        });
        true
    }
}
