use serde::{Deserialize, Serialize};

use crate::geometry::polygon::RoadPolygon;
use crate::types::Point2;

/// Axis-aligned map region the road geometry must stay inside.
///
/// Shared read-only between genomes; serialized by its `(min_x, min_y,
/// max_x, max_y)` extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadBoundingBox {
    pub bounds: (f64, f64, f64, f64),
}

impl RoadBoundingBox {
    pub fn new(bounds: (f64, f64, f64, f64)) -> Self {
        Self { bounds }
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }

    /// True iff every vertex of the polygon lies within the extent.
    pub fn contains(&self, polygon: &RoadPolygon) -> bool {
        polygon.vertices().iter().all(|&p| self.contains_point(p))
    }
}
