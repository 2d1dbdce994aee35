use crate::pipeline::distance::haversine_miles;
use crate::types::geo::GeoPoint;
use crate::types::quality::{DensityClass, QualityAssessment};

pub const STRAIGHTNESS_WARNING: f64 = 0.9;
pub const MIN_CHART_POINTS: usize = 5;

const FAIR_DENSITY_PENALTY: i32 = 20;
const POOR_DENSITY_PENALTY: i32 = 40;
const MISSING_ELEVATION_PENALTY: i32 = 30;
const MISSING_CHART_PENALTY: i32 = 10;
const SPARSE_CHART_PENALTY: i32 = 5;
const MISSING_MARKERS_PENALTY: i32 = 5;
const STRAIGHT_PATH_PENALTY: i32 = 10;

pub fn total_distance(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_miles(&pair[0], &pair[1]))
        .sum()
}

pub fn cumulative_distances(path: &[GeoPoint]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(path.len());
    let mut total = 0.0;
    for (i, point) in path.iter().enumerate() {
        if i > 0 {
            total += haversine_miles(&path[i - 1], point);
        }
        distances.push(total);
    }
    distances
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub points_per_mile: f64,
    pub zero_distance: bool,
}

pub fn points_per_mile(point_count: usize, distance_mi: f64) -> Density {
    if distance_mi > 0.0 {
        Density {
            points_per_mile: point_count as f64 / distance_mi,
            zero_distance: false,
        }
    } else {
        Density {
            points_per_mile: 0.0,
            zero_distance: true,
        }
    }
}

pub fn straightness(path: &[GeoPoint]) -> Option<f64> {
    if path.len() < 3 {
        return None;
    }
    let actual = total_distance(path);
    if actual <= 0.0 {
        return None;
    }
    let (first, last) = (&path[0], &path[path.len() - 1]);
    Some(haversine_miles(first, last) / actual)
}

pub fn assess_quality(
    path: &[GeoPoint],
    distance_hint: f64,
    chart_len: usize,
    has_markers: bool,
) -> QualityAssessment {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut score: i32 = 100;

    let mut distance = distance_hint;
    if distance == 0.0 {
        distance = total_distance(path);
        warnings.push(format!(
            "No distance in stats, calculated: {:.1} mi",
            distance
        ));
    }

    let density = points_per_mile(path.len(), distance);
    if density.zero_distance {
        warnings.push("Trail distance is 0".to_string());
    }

    let quality = DensityClass::classify(density.points_per_mile);
    match quality {
        DensityClass::Good => {}
        DensityClass::Fair => {
            warnings.push(format!(
                "Low GPS density: {:.1} pts/mi (recommend 15+)",
                density.points_per_mile
            ));
            score -= FAIR_DENSITY_PENALTY;
        }
        DensityClass::Poor => {
            issues.push(format!(
                "Very low GPS density: {:.1} pts/mi (need 15+)",
                density.points_per_mile
            ));
            score -= POOR_DENSITY_PENALTY;
        }
    }

    let has_elevation = path.iter().all(|p| p.elevation.is_some());
    if !has_elevation {
        issues.push("Missing elevation data in path".to_string());
        score -= MISSING_ELEVATION_PENALTY;
    }

    if chart_len == 0 {
        warnings.push("No elevation chart data".to_string());
        score -= MISSING_CHART_PENALTY;
    } else if chart_len < MIN_CHART_POINTS {
        warnings.push(format!(
            "Too few chart points: {} (recommend 10+)",
            chart_len
        ));
        score -= SPARSE_CHART_PENALTY;
    }

    if !has_markers {
        warnings.push("No start/summit markers".to_string());
        score -= MISSING_MARKERS_PENALTY;
    }

    let straightness = straightness(path);
    if let Some(ratio) = straightness {
        if ratio > STRAIGHTNESS_WARNING {
            warnings.push(format!(
                "Path very straight: {:.2} (may be oversimplified)",
                ratio
            ));
            score -= STRAIGHT_PATH_PENALTY;
        }
    }

    QualityAssessment {
        gps_points: path.len(),
        distance_mi: distance,
        points_per_mile: density.points_per_mile,
        quality,
        straightness,
        has_elevation,
        chart_points: chart_len,
        score: score.clamp(0, 100) as u8,
        issues,
        warnings,
    }
}

pub fn elevation_range(path: &[GeoPoint]) -> Option<(f64, f64)> {
    let mut elevations = path.iter().filter_map(|p| p.elevation);
    let first = elevations.next()?;
    Some(elevations.fold((first, first), |(min, max), e| (min.min(e), max.max(e))))
}
