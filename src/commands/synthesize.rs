use std::path::Path;

use serde_json::Value;

use crate::config::ToolkitConfig;
use crate::error::AppError;
use crate::pipeline::chart::sample_chart;
use crate::pipeline::densify::path_between_markers;
use crate::pipeline::metrics::points_per_mile;
use crate::store;
use crate::types::geo::GeoPoint;
use crate::types::trail::TrailDocument;

pub const SYNTHESIZED_GPS_SOURCE: &str = "Generated from start/summit markers (pending GPX import)";
pub const SYNTHESIZED_NOTE: &str = "GPS path generated from trail markers pending verified GPX import.";

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    pub points: usize,
    pub distance_mi: f64,
    pub points_per_mile: f64,
}

pub fn synthesis_steps(distance_mi: f64, points_per_mile: f64, min_points: usize) -> usize {
    let wanted = (distance_mi * points_per_mile).floor();
    let wanted = if wanted.is_finite() && wanted > 0.0 {
        wanted as usize
    } else {
        0
    };
    wanted.max(min_points).max(1)
}

pub fn synthesize_document(
    doc: &mut TrailDocument,
    toolkit: &ToolkitConfig,
    base_override: Option<f64>,
) -> Result<SynthesisOutcome, AppError> {
    let options = &toolkit.synthesis;
    let base_ft = base_override.unwrap_or_else(|| toolkit.elevation.base_elevation(doc.display_name()));

    let trail = doc
        .primary_trail_mut()
        .ok_or_else(|| AppError::missing("", "trails"))?;
    let stats = trail.stats.as_ref();
    let distance_mi = stats
        .and_then(|s| s.distance)
        .filter(|d| *d > 0.0)
        .unwrap_or(options.fallback_distance_mi);
    let gain_ft = stats
        .and_then(|s| s.gain)
        .unwrap_or(options.fallback_gain_ft);

    let geo = trail
        .geo
        .as_mut()
        .ok_or_else(|| AppError::missing("", "geo"))?;
    let markers = geo
        .markers
        .as_ref()
        .ok_or_else(|| AppError::missing("", "geo.markers"))?;
    let start = markers
        .start
        .ok_or_else(|| AppError::missing("", "geo.markers.start"))?;
    let summit = markers
        .summit
        .ok_or_else(|| AppError::missing("", "geo.markers.summit"))?;

    let steps = synthesis_steps(distance_mi, options.points_per_mile, options.min_points);
    let path: Vec<GeoPoint> = path_between_markers(&start, &summit, steps, base_ft, gain_ft)
        .iter()
        .map(GeoPoint::rounded)
        .collect();
    let chart = sample_chart(&path, toolkit.chart_points)?;

    let points = path.len();
    geo.path = Some(path);
    geo.chart = Some(chart);

    if let Some(sources) = doc.data_sources.as_mut() {
        sources.gps_source = Some(SYNTHESIZED_GPS_SOURCE.to_string());
        if sources.notes.is_some() {
            sources.append_note(SYNTHESIZED_NOTE);
        }
    }

    Ok(SynthesisOutcome {
        points,
        distance_mi,
        points_per_mile: points_per_mile(points, distance_mi).points_per_mile,
    })
}

pub fn synthesize_file(
    path: &Path,
    toolkit: &ToolkitConfig,
    base_override: Option<f64>,
) -> Result<SynthesisOutcome, AppError> {
    let mut raw: Value = store::read_json(path)?;
    let mut doc: TrailDocument = store::decode(path, raw.clone())?;
    tracing::info!("Creating path for {}", doc.display_name());

    let outcome = synthesize_document(&mut doc, toolkit, base_override).map_err(|err| err.at(path))?;
    store::merge_primary_trail(path, &mut raw, &doc)?;
    store::write_json(path, &raw)?;

    tracing::info!(
        "Created path with {} points ({:.1} pts/mi)",
        outcome.points,
        outcome.points_per_mile
    );
    Ok(outcome)
}
