use crate::types::geo::GeoPoint;

pub fn simplify_path(points: &[GeoPoint], max_points: usize) -> Vec<GeoPoint> {
    if max_points == 0 || points.len() <= max_points {
        return points.to_vec();
    }

    let step = points.len() / max_points;
    let mut simplified: Vec<GeoPoint> = points.iter().step_by(step).copied().collect();

    if let (Some(kept), Some(last)) = (simplified.last(), points.last()) {
        if kept != last {
            simplified.push(*last);
        }
    }

    simplified
}
