use serde::{Deserialize, Serialize};

/// A single road anchor: centerline position plus lane width.
///
/// Persisted as a plain `(x, y, z, width)` tuple so serialized roads are
/// sequences of 4-tuples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64, f64)", into = "(f64, f64, f64, f64)")]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64, z: f64, width: f64) -> Self {
        Self { x, y, z, width }
    }
}

impl From<(f64, f64, f64, f64)> for ControlPoint {
    fn from(t: (f64, f64, f64, f64)) -> Self {
        Self { x: t.0, y: t.1, z: t.2, width: t.3 }
    }
}

impl From<ControlPoint> for (f64, f64, f64, f64) {
    fn from(p: ControlPoint) -> Self {
        (p.x, p.y, p.z, p.width)
    }
}

/// Planar point used for polygon and bounding-box checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Which planar coordinate of a control point a perturbation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Outcome handle returned by the external driving simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub passed: bool,
    pub min_distance_from_boundary: f64,
}
