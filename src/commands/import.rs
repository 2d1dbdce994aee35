use std::path::Path;

use serde_json::{Map, Value};

use crate::config::ToolkitConfig;
use crate::error::{AppError, StoreError};
use crate::pipeline::chart::sample_chart;
use crate::pipeline::metrics::{elevation_range, total_distance};
use crate::pipeline::parse;
use crate::pipeline::simplify::simplify_path;
use crate::store;
use crate::types::geo::{round_to, CompactNumber, GeoPoint};
use crate::types::track::{FileFormat, ParsedTrack, TrackKind};
use crate::types::trail::{Geo, Markers};

#[derive(Debug, Clone)]
pub struct ImportedGeo {
    pub geo: Geo,
    pub source_points: usize,
    pub distance_mi: f64,
    pub gain_ft: f64,
    pub min_elevation_ft: f64,
    pub max_elevation_ft: f64,
}

pub fn read_track(source: &Path) -> Result<ParsedTrack, AppError> {
    let filename = source.to_string_lossy();
    let format = FileFormat::from_filename(&filename).ok_or_else(|| {
        AppError::BadArgument(format!("Unsupported file format: {}", source.display()))
    })?;
    let bytes = std::fs::read(source).map_err(|err| StoreError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;

    tracing::info!("Parsing {} file: {}", format.as_str(), source.display());
    let track = parse::parse(&bytes, format)?;
    tracing::info!(
        "Found {} GPS points in the {} {}",
        track.points.len(),
        track.file_format.as_str(),
        track.kind.as_str()
    );
    if track.kind == TrackKind::Route {
        tracing::warn!("No recorded track in {}; using planned route points", source.display());
    }
    Ok(track)
}

pub fn build_geo(track: &ParsedTrack, toolkit: &ToolkitConfig) -> Result<ImportedGeo, AppError> {
    let missing = track.points.len() - track.elevation_coverage();
    if missing > 0 {
        tracing::warn!("{} points have no elevation; recording them at 0 ft", missing);
    }

    let rounded: Vec<GeoPoint> = track
        .points
        .iter()
        .map(|p| GeoPoint {
            elevation: Some(p.elevation.unwrap_or(0.0)),
            ..*p
        })
        .map(|p| p.rounded())
        .collect();

    let points = simplify_path(&rounded, toolkit.import_max_points);
    if points.len() < rounded.len() {
        tracing::info!("Simplified to {} points (from {})", points.len(), rounded.len());
    }

    let chart = sample_chart(&points, toolkit.chart_points)?;
    let distance_mi = round_to(total_distance(&points), 1);
    let (min_elevation_ft, max_elevation_ft) = elevation_range(&points).unwrap_or((0.0, 0.0));

    let geo = Geo {
        markers: Markers::from_path(&points),
        path: Some(points),
        chart: Some(chart),
        extra: Map::new(),
    };

    Ok(ImportedGeo {
        geo,
        source_points: track.points.len(),
        distance_mi,
        gain_ft: (max_elevation_ft - min_elevation_ft).round(),
        min_elevation_ft,
        max_elevation_ft,
    })
}

pub fn apply_to_trail_file(target: &Path, imported: &ImportedGeo) -> Result<(), AppError> {
    let mut doc: Value = store::read_json(target)?;
    let trail = doc
        .get_mut("trails")
        .and_then(Value::as_array_mut)
        .and_then(|trails| trails.first_mut())
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AppError::missing(target, "trails"))?;

    let encode = |value: Result<Value, serde_json::Error>| {
        value.map_err(|err| AppError::Failed(err.to_string()))
    };
    trail.insert("geo".to_string(), encode(serde_json::to_value(&imported.geo))?);

    let stats = trail
        .entry("stats")
        .or_insert_with(|| Value::Object(Map::new()));
    if !stats.is_object() {
        *stats = Value::Object(Map::new());
    }
    if let Some(stats) = stats.as_object_mut() {
        stats.insert(
            "distance".to_string(),
            encode(serde_json::to_value(CompactNumber(imported.distance_mi)))?,
        );
        stats.insert(
            "gain".to_string(),
            encode(serde_json::to_value(CompactNumber(imported.gain_ft)))?,
        );
    }

    store::write_json(target, &doc)?;
    tracing::info!("Updated geo.path, geo.chart, and stats in {}", target.display());
    Ok(())
}
