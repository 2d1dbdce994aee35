use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::pipeline::distance::haversine_miles;
use crate::types::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainVariation {
    pub amplitude_ft: f64,
    pub cycles: f64,
}

impl Default for TerrainVariation {
    fn default() -> Self {
        Self {
            amplitude_ft: 0.0,
            cycles: 3.0,
        }
    }
}

impl TerrainVariation {
    pub fn is_enabled(&self) -> bool {
        self.amplitude_ft != 0.0 && self.cycles != 0.0
    }

    fn offset(&self, fraction: f64) -> f64 {
        if !self.is_enabled() {
            return 0.0;
        }
        (fraction * PI * self.cycles).sin() * self.amplitude_ft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensifyOptions {
    pub target_points_per_mile: f64,
    pub min_points_per_segment: usize,
    pub variation: TerrainVariation,
}

impl Default for DensifyOptions {
    fn default() -> Self {
        Self {
            target_points_per_mile: 20.0,
            min_points_per_segment: 15,
            variation: TerrainVariation::default(),
        }
    }
}

pub fn segment_steps(segment_mi: f64, options: &DensifyOptions) -> usize {
    let desired = (segment_mi * options.target_points_per_mile).ceil();
    let desired = if desired.is_finite() && desired > 0.0 {
        desired as usize
    } else {
        0
    };
    desired.max(options.min_points_per_segment).max(1)
}

pub fn interpolate_segment(
    start: &GeoPoint,
    end: &GeoPoint,
    start_ele: f64,
    end_ele: f64,
    steps: usize,
    variation: &TerrainVariation,
) -> Vec<GeoPoint> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let fraction = i as f64 / steps as f64;
            let lat = start.lat + (end.lat - start.lat) * fraction;
            let lon = start.lon + (end.lon - start.lon) * fraction;
            let base = start_ele + (end_ele - start_ele) * fraction;
            GeoPoint::with_elevation(lat, lon, base + variation.offset(fraction))
        })
        .collect()
}

pub fn densify(path: &[GeoPoint], options: &DensifyOptions) -> Result<Vec<GeoPoint>, GeoError> {
    if path.len() < 2 {
        return Err(GeoError::InsufficientPoints(path.len()));
    }
    let elevations = require_elevation(path)?;

    let mut densified = Vec::new();
    for i in 0..path.len() - 1 {
        let (start, end) = (&path[i], &path[i + 1]);
        let steps = segment_steps(haversine_miles(start, end), options);
        let mut segment = interpolate_segment(
            start,
            end,
            elevations[i],
            elevations[i + 1],
            steps,
            &options.variation,
        );
        segment.pop();
        densified.extend(segment);
    }
    densified.push(path[path.len() - 1]);

    Ok(densified)
}

fn require_elevation(path: &[GeoPoint]) -> Result<Vec<f64>, GeoError> {
    path.iter()
        .enumerate()
        .map(|(index, p)| p.elevation.ok_or(GeoError::MissingElevation { index }))
        .collect()
}

pub fn backfill_elevation(path: &mut [GeoPoint], start_ft: f64, gain_ft: f64) {
    let last = path.len().saturating_sub(1);
    for (i, point) in path.iter_mut().enumerate() {
        if point.elevation.is_some() {
            continue;
        }
        let fraction = if last > 0 { i as f64 / last as f64 } else { 0.0 };
        point.elevation = Some((start_ft + gain_ft * fraction).round());
    }
}

/// Straight-line path between two markers with an eased climb
/// (`sin(f·π/2)`): steep at the trailhead, flattening toward the summit.
pub fn path_between_markers(
    start: &GeoPoint,
    summit: &GeoPoint,
    steps: usize,
    start_ft: f64,
    gain_ft: f64,
) -> Vec<GeoPoint> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let fraction = i as f64 / steps as f64;
            let lat = start.lat + (summit.lat - start.lat) * fraction;
            let lon = start.lon + (summit.lon - start.lon) * fraction;
            let eased = (fraction * PI / 2.0).sin();
            GeoPoint::with_elevation(lat, lon, start_ft + gain_ft * eased)
        })
        .collect()
}
