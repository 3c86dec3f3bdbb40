use crate::types::ControlPoint;

/// Interpolate a dense centerline through the given control points.
///
/// Produces `num_spline_nodes` samples per interior span plus the final span
/// endpoint. Width and elevation are interpolated alongside x/y so each sample
/// is itself a full control-point tuple. Deterministic for identical inputs;
/// callers rely on that to keep derived samples reproducible.
pub fn catmull_rom(points: &[ControlPoint], num_spline_nodes: usize) -> Vec<ControlPoint> {
    if points.len() < 4 || num_spline_nodes == 0 {
        return points.to_vec();
    }

    let mut samples = Vec::with_capacity((points.len() - 3) * num_spline_nodes + 1);
    for seg in 0..points.len() - 3 {
        for step in 0..num_spline_nodes {
            let t = step as f64 / num_spline_nodes as f64;
            samples.push(spline_point(
                points[seg],
                points[seg + 1],
                points[seg + 2],
                points[seg + 3],
                t,
            ));
        }
    }

    // Close the curve at the last interior control point.
    let n = points.len();
    samples.push(spline_point(points[n - 4], points[n - 3], points[n - 2], points[n - 1], 1.0));
    samples
}

/// Uniform Catmull-Rom basis with tension 0.5, evaluated on the span p1..p2.
fn spline_point(p0: ControlPoint, p1: ControlPoint, p2: ControlPoint, p3: ControlPoint, t: f64) -> ControlPoint {
    let t2 = t * t;
    let t3 = t2 * t;

    let b0 = -0.5 * t3 + t2 - 0.5 * t;
    let b1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let b2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let b3 = 0.5 * t3 - 0.5 * t2;

    ControlPoint {
        x: b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        y: b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
        z: b0 * p0.z + b1 * p1.z + b2 * p2.z + b3 * p3.z,
        width: b0 * p0.width + b1 * p1.width + b2 * p2.width + b3 * p3.width,
    }
}
