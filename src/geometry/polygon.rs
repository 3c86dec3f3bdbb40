use crate::types::{ControlPoint, Point2};

/// Closed outline of a road: the right edge walked forward, then the left
/// edge walked back. Edge offsets come from each node's width, perpendicular
/// to the local travel direction.
#[derive(Debug, Clone)]
pub struct RoadPolygon {
    ring: Vec<Point2>,
    num_nodes: usize,
}

impl RoadPolygon {
    pub fn from_nodes(nodes: &[ControlPoint]) -> Self {
        let num_nodes = nodes.len();
        if num_nodes < 2 {
            return Self { ring: Vec::new(), num_nodes };
        }

        let mut right = Vec::with_capacity(num_nodes);
        let mut left = Vec::with_capacity(num_nodes);
        for i in 0..num_nodes {
            let prev = nodes[i.saturating_sub(1)];
            let next = nodes[(i + 1).min(num_nodes - 1)];
            let mut dx = next.x - prev.x;
            let mut dy = next.y - prev.y;
            let norm = (dx * dx + dy * dy).sqrt();
            if norm < f64::EPSILON {
                // Degenerate segment, fall back to an arbitrary heading.
                dx = 1.0;
                dy = 0.0;
            } else {
                dx /= norm;
                dy /= norm;
            }
            let half = nodes[i].width / 2.0;
            left.push(Point2 { x: nodes[i].x - dy * half, y: nodes[i].y + dx * half });
            right.push(Point2 { x: nodes[i].x + dy * half, y: nodes[i].y - dx * half });
        }

        let mut ring = right;
        ring.extend(left.into_iter().rev());
        Self { ring, num_nodes }
    }

    /// True iff the outline has enough nodes to enclose area and no two
    /// non-adjacent edges properly cross.
    pub fn is_valid(&self) -> bool {
        if self.num_nodes < 3 {
            return false;
        }
        let m = self.ring.len();
        for i in 0..m {
            for j in (i + 1)..m {
                if j == i + 1 || (i == 0 && j == m - 1) {
                    continue;
                }
                let a1 = self.ring[i];
                let a2 = self.ring[(i + 1) % m];
                let b1 = self.ring[j];
                let b2 = self.ring[(j + 1) % m];
                if segments_intersect(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.ring
    }
}

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(a: Point2, b: Point2, p: Point2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Segment intersection including collinear overlap and endpoint touches.
/// Non-adjacent edges of a well-formed road outline never touch at all, so
/// any contact counts as a self-intersection.
fn segments_intersect(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}
