//! Viewport model
//!
//! Pan/zoom state and the screen/canvas coordinate transforms used to
//! interpret pointer events. `(x, y)` is the canvas-space point under the
//! screen origin; `width`/`height` are the viewport extent in screen units.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Bounds, Position2D};

const DEFAULT_SCALE: f64 = 1.0;
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 4.0;

/// Pan/zoom state of the canvas viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportModel {
    /// Canvas-space x of the screen origin
    pub x: f64,
    /// Canvas-space y of the screen origin
    pub y: f64,
    /// Viewport width in screen units
    pub width: f64,
    /// Viewport height in screen units
    pub height: f64,
    /// Zoom factor; screen units per canvas unit
    pub scale: f64,
}

impl ViewportModel {
    /// A viewport of the given screen size at the origin, unzoomed
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Translate the viewport by canvas-space deltas
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Multiply the zoom factor, clamped to a sane range
    pub fn zoom(&mut self, factor: f64) {
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Restore origin and default zoom, keeping the screen size
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.scale = DEFAULT_SCALE;
    }

    /// Recompute the origin so the given canvas bounds are centered
    pub fn center_on(&mut self, bounds: Bounds) {
        let center = bounds.center();
        self.x = center.x - self.width / (2.0 * self.scale);
        self.y = center.y - self.height / (2.0 * self.scale);
    }

    /// Map a screen-space point to canvas space
    pub fn screen_to_canvas(&self, screen: Position2D) -> Position2D {
        Position2D::new(screen.x / self.scale + self.x, screen.y / self.scale + self.y)
    }

    /// Map a canvas-space point to screen space
    pub fn canvas_to_screen(&self, canvas: Position2D) -> Position2D {
        Position2D::new((canvas.x - self.x) * self.scale, (canvas.y - self.y) * self.scale)
    }

    /// The viewport's screen-space rectangle, origin at (0, 0)
    pub fn screen_rect(&self) -> ScreenRect {
        ScreenRect {
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// The screen-space extent of the viewport, used for edge-proximity checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub width: f64,
    pub height: f64,
}
