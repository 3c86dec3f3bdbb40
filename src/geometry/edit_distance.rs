use crate::types::ControlPoint;

/// Edit-distance dissimilarity between two sample polylines.
///
/// Each polyline is reduced to its sequence of segment headings; the distance
/// is an iterative Levenshtein over those sequences with insert/delete cost 1
/// and a substitution cost proportional to the angular difference. Symmetric,
/// non-negative, and zero for identical polylines.
pub fn iterative_levenshtein(a: &[ControlPoint], b: &[ControlPoint]) -> f64 {
    let ha = headings(a);
    let hb = headings(b);

    let rows = ha.len() + 1;
    let cols = hb.len() + 1;
    let mut dist = vec![vec![0.0_f64; cols]; rows];

    for (i, row) in dist.iter_mut().enumerate() {
        row[0] = i as f64;
    }
    for j in 0..cols {
        dist[0][j] = j as f64;
    }

    for i in 1..rows {
        for j in 1..cols {
            let substitution = dist[i - 1][j - 1] + heading_cost(ha[i - 1], hb[j - 1]);
            let deletion = dist[i - 1][j] + 1.0;
            let insertion = dist[i][j - 1] + 1.0;
            dist[i][j] = substitution.min(deletion).min(insertion);
        }
    }

    dist[rows - 1][cols - 1]
}

/// Heading of each consecutive segment, in degrees.
fn headings(points: &[ControlPoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| (w[1].y - w[0].y).atan2(w[1].x - w[0].x).to_degrees())
        .collect()
}

/// Angular difference normalized to [0, 1].
fn heading_cost(a: f64, b: f64) -> f64 {
    let mut diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        diff = 360.0 - diff;
    }
    diff / 180.0
}
