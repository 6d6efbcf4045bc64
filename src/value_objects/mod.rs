//! Graph value objects
//!
//! Value objects are immutable types that represent concepts in the impact
//! graph domain. They are compared by value rather than identity and
//! encapsulate domain validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the different kinds of nodes in an impact graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A top-level business metric (revenue, churn, ...)
    BusinessMetric,
    /// A product metric that drives a business metric
    ProductMetric,
    /// An initiative undertaken to move a product metric
    Initiative,
}

impl NodeType {
    /// Parse a node type from its snapshot string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "business_metric" => Some(NodeType::BusinessMetric),
            "product_metric" => Some(NodeType::ProductMetric),
            "initiative" => Some(NodeType::Initiative),
            _ => None,
        }
    }

    /// Get the string representation of the node type
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::BusinessMetric => "business_metric",
            NodeType::ProductMetric => "product_metric",
            NodeType::Initiative => "initiative",
        }
    }

    /// The tier this node type occupies in the impact hierarchy
    pub fn tier(&self) -> u8 {
        match self {
            NodeType::BusinessMetric => 1,
            NodeType::ProductMetric => 2,
            NodeType::Initiative => 3,
        }
    }

    /// The default fill color for a freshly created node of this type
    pub fn default_color(&self) -> &'static str {
        match self {
            NodeType::BusinessMetric => "#2563eb",
            NodeType::ProductMetric => "#7c3aed",
            NodeType::Initiative => "#f59e0b",
        }
    }

    /// The shape used to render nodes of this type
    pub fn default_shape(&self) -> Shape {
        match self {
            NodeType::BusinessMetric | NodeType::ProductMetric => Shape::Ellipse,
            NodeType::Initiative => Shape::Rectangle,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the different kinds of relationships between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// The source is expected to move the target in the desired direction
    DesirableEffect,
    /// The source is expected to move the target against the desired direction
    UndesirableEffect,
    /// The source rolls its contribution up into the target
    Rollup,
}

impl RelationshipType {
    /// Parse a relationship type from its snapshot string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desirable_effect" => Some(RelationshipType::DesirableEffect),
            "undesirable_effect" => Some(RelationshipType::UndesirableEffect),
            "rollup" => Some(RelationshipType::Rollup),
            _ => None,
        }
    }

    /// Get the string representation of the relationship type
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::DesirableEffect => "desirable_effect",
            RelationshipType::UndesirableEffect => "undesirable_effect",
            RelationshipType::Rollup => "rollup",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a measurement captures a proximate or a downstream impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactType {
    /// Measured directly on the node's own metric
    Proximate,
    /// Measured further down the impact chain
    Downstream,
}

impl ImpactType {
    /// Get the string representation of the impact type
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactType::Proximate => "proximate",
            ImpactType::Downstream => "downstream",
        }
    }
}

impl fmt::Display for ImpactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The shape a node is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Rectangle,
    Ellipse,
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Rectangle
    }
}

/// Represents a position in 2D space
///
/// Pointer events carry screen-space positions; nodes store canvas-space
/// positions. The two spaces are related by the viewport transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get the distance to another position
    pub fn distance_to(&self, other: &Position2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - other`
    pub fn delta_from(&self, other: &Position2D) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

impl Default for Position2D {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// An axis-aligned bounding box in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from two corners
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The center of the box
    pub fn center(&self) -> Position2D {
        Position2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grow the box to include a point
    pub fn include(&mut self, p: Position2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Bounds enclosing a set of points, or `None` when the set is empty
    pub fn enclosing(points: impl IntoIterator<Item = Position2D>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }
}
