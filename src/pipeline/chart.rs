use crate::error::GeoError;
use crate::pipeline::metrics::cumulative_distances;
use crate::types::geo::{round_to, ChartPoint, GeoPoint};

pub const DEFAULT_CHART_POINTS: usize = 15;

/// Reduces a path to `n` elevation samples evenly spaced by distance.
pub fn sample_chart(path: &[GeoPoint], n: usize) -> Result<Vec<ChartPoint>, GeoError> {
    if path.is_empty() || n == 0 {
        return Ok(Vec::new());
    }

    let distances = cumulative_distances(path);
    let total = distances[distances.len() - 1];

    (0..n)
        .map(|i| {
            let target = if n > 1 {
                total * i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            let index = nearest_index(&distances, target);
            let elevation = path[index]
                .elevation
                .ok_or(GeoError::MissingElevation { index })?;
            Ok(ChartPoint::new(round_to(target, 2), elevation.round()))
        })
        .collect()
}

fn nearest_index(distances: &[f64], target: f64) -> usize {
    let upper = distances.partition_point(|d| *d < target);
    if upper == 0 {
        return 0;
    }
    if upper == distances.len() {
        return distances.len() - 1;
    }
    let mut below = upper - 1;
    if (target - distances[below]).abs() > (distances[upper] - target).abs() {
        return upper;
    }
    // Zero-length segments repeat a distance; keep the first vertex.
    while below > 0 && distances[below - 1] == distances[below] {
        below -= 1;
    }
    below
}
