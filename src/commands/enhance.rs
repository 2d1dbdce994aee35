use std::path::Path;

use serde_json::Value;

use crate::config::ToolkitConfig;
use crate::error::{AppError, GeoError};
use crate::pipeline::chart::sample_chart;
use crate::pipeline::densify::{backfill_elevation, densify};
use crate::pipeline::metrics::{points_per_mile, total_distance};
use crate::store;
use crate::types::geo::GeoPoint;
use crate::types::trail::{Markers, TrailDocument};

pub const ENHANCED_GPS_SOURCE: &str = "Enhanced via interpolation (pending GPX import)";
pub const ENHANCED_NOTE: &str = "GPS path enhanced with interpolated points and estimated elevation data pending verified GPX import.";
pub const SYNTHETIC_ELEVATION_SOURCE: &str =
    "Estimated: linear interpolation with synthetic terrain variation (not measured)";

#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceOutcome {
    pub original_points: usize,
    pub enhanced_points: usize,
    pub distance_mi: f64,
    pub points_per_mile: f64,
    pub backfilled: bool,
}

pub fn enhance_document(
    doc: &mut TrailDocument,
    toolkit: &ToolkitConfig,
    base_override: Option<f64>,
) -> Result<EnhanceOutcome, AppError> {
    let base_ft = base_override.unwrap_or_else(|| toolkit.elevation.base_elevation(doc.display_name()));

    let trail = doc
        .primary_trail_mut()
        .ok_or_else(|| AppError::missing("", "trails"))?;
    let stats_distance = trail.stats.as_ref().map(|s| s.distance_or_zero()).unwrap_or(0.0);
    let gain_ft = trail
        .stats
        .as_ref()
        .and_then(|s| s.gain)
        .unwrap_or(toolkit.elevation.default_gain_ft);

    let geo = trail
        .geo
        .as_mut()
        .ok_or_else(|| AppError::missing("", "geo"))?;
    let path = geo
        .path
        .as_mut()
        .ok_or_else(|| AppError::missing("", "geo.path"))?;
    if path.len() < 2 {
        return Err(GeoError::InsufficientPoints(path.len()).into());
    }

    let original_points = path.len();
    let distance_mi = if stats_distance > 0.0 {
        stats_distance
    } else {
        total_distance(path)
    };

    let backfilled = path.iter().any(|p| p.elevation.is_none());
    if backfilled {
        tracing::info!(
            "Backfilling elevation from {:.0} ft with {:.0} ft gain",
            base_ft,
            gain_ft
        );
        backfill_elevation(path, base_ft, gain_ft);
    }

    let enhanced: Vec<GeoPoint> = densify(path, &toolkit.densify)?
        .iter()
        .map(GeoPoint::rounded)
        .collect();
    let chart = sample_chart(&enhanced, toolkit.chart_points)?;

    let mut markers = geo.markers.take().unwrap_or_default();
    if let Some(fresh) = Markers::from_path(&enhanced) {
        markers.start = fresh.start;
        markers.summit = fresh.summit;
    }
    geo.markers = Some(markers);
    geo.chart = Some(chart);
    let enhanced_points = enhanced.len();
    geo.path = Some(enhanced);

    if let Some(sources) = doc.data_sources.as_mut() {
        sources.gps_source = Some(ENHANCED_GPS_SOURCE.to_string());
        if toolkit.densify.variation.is_enabled() {
            sources.elevation_source = Some(SYNTHETIC_ELEVATION_SOURCE.to_string());
        }
        sources.append_note(ENHANCED_NOTE);
    }

    Ok(EnhanceOutcome {
        original_points,
        enhanced_points,
        distance_mi,
        points_per_mile: points_per_mile(enhanced_points, distance_mi).points_per_mile,
        backfilled,
    })
}

pub fn enhance_file(
    path: &Path,
    toolkit: &ToolkitConfig,
    base_override: Option<f64>,
    dry_run: bool,
) -> Result<EnhanceOutcome, AppError> {
    let mut raw: Value = store::read_json(path)?;
    let mut doc: TrailDocument = store::decode(path, raw.clone())?;
    tracing::info!("Enhancing {} ({})", doc.display_name(), path.display());

    let outcome = enhance_document(&mut doc, toolkit, base_override).map_err(|err| err.at(path))?;

    tracing::info!(
        "{} -> {} points over {:.1} mi ({:.1} pts/mi)",
        outcome.original_points,
        outcome.enhanced_points,
        outcome.distance_mi,
        outcome.points_per_mile
    );

    if dry_run {
        tracing::info!("Dry run, {} left untouched", path.display());
    } else {
        store::merge_primary_trail(path, &mut raw, &doc)?;
        store::write_json(path, &raw)?;
    }
    Ok(outcome)
}
