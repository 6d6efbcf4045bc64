//! Auto-pan controller
//!
//! While a drag session is active, each host tick nudges the viewport when
//! the pointer is near an edge, so a drag can carry a node beyond the
//! visible canvas. Velocity ramps linearly from zero at the threshold to
//! `max_speed` at the edge itself, in screen units per tick, and is
//! converted to canvas units before panning.
//!
//! Session guards enforce the start/stop contract: exactly one active
//! session per drag, guaranteed teardown on drag end. A missed `end_session`
//! would keep the viewport panning after the drag has ended.

use serde::{Deserialize, Serialize};

use crate::value_objects::Position2D;
use crate::viewport::{ScreenRect, ViewportModel};

/// Tuning for edge-proximity panning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoPanConfig {
    /// Distance from an edge, in screen units, at which panning engages
    pub threshold: f64,
    /// Pan speed at the edge itself, in screen units per tick
    pub max_speed: f64,
}

impl Default for AutoPanConfig {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            max_speed: 10.0,
        }
    }
}

/// Screen-space pan velocity for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanVelocity {
    pub dx: f64,
    pub dy: f64,
}

impl PanVelocity {
    /// Whether this tick pans at all
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Per-tick controller that pans the viewport during drag sessions
#[derive(Debug, Clone, Default)]
pub struct AutoPanController {
    config: AutoPanConfig,
    session_active: bool,
}

impl AutoPanController {
    /// Create a controller with the given tuning
    pub fn new(config: AutoPanConfig) -> Self {
        Self {
            config,
            session_active: false,
        }
    }

    /// Whether a drag session currently drives this controller
    pub fn is_active(&self) -> bool {
        self.session_active
    }

    /// Begin a drag session; a second begin without an end is a no-op
    pub fn begin_session(&mut self) {
        if self.session_active {
            tracing::warn!("auto-pan session already active, ignoring begin");
            return;
        }
        self.session_active = true;
        tracing::debug!("auto-pan session started");
    }

    /// End the drag session; ending twice is a no-op
    pub fn end_session(&mut self) {
        if !self.session_active {
            return;
        }
        self.session_active = false;
        tracing::debug!("auto-pan session stopped");
    }

    /// One scheduled tick: pan the viewport if the pointer is near an edge
    ///
    /// `pointer` is in screen space relative to the viewport origin. Does
    /// nothing when no session is active. Returns the applied screen-space
    /// velocity so the host can decide whether anything changed.
    pub fn tick(&self, pointer: Position2D, viewport: &mut ViewportModel) -> PanVelocity {
        if !self.session_active {
            return PanVelocity::default();
        }
        let velocity = self.edge_velocity(pointer, viewport.screen_rect());
        if !velocity.is_zero() {
            // Screen-space speed divided by scale keeps the perceived pan
            // rate constant across zoom levels.
            viewport.pan(velocity.dx / viewport.scale, velocity.dy / viewport.scale);
        }
        velocity
    }

    /// Edge-proximity velocity, at most one horizontal and one vertical
    /// contribution, directed away from the near edge
    pub fn edge_velocity(&self, pointer: Position2D, rect: ScreenRect) -> PanVelocity {
        let t = self.config.threshold;
        let max = self.config.max_speed;

        let mut velocity = PanVelocity::default();

        let from_left = pointer.x;
        let from_right = rect.width - pointer.x;
        if from_left < t {
            velocity.dx = -(1.0 - from_left / t) * max;
        } else if from_right < t {
            velocity.dx = (1.0 - from_right / t) * max;
        }

        let from_top = pointer.y;
        let from_bottom = rect.height - pointer.y;
        if from_top < t {
            velocity.dy = -(1.0 - from_top / t) * max;
        } else if from_bottom < t {
            velocity.dy = (1.0 - from_bottom / t) * max;
        }

        velocity
    }
}
