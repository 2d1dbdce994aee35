use serde::{Deserialize, Serialize};

use crate::types::geo::GeoPoint;

pub const FEET_PER_METER: f64 = 3.28084;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    Gpx,
    Fit,
}

impl FileFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "gpx" => Some(FileFormat::Gpx),
            "fit" => Some(FileFormat::Fit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Gpx => "gpx",
            FileFormat::Fit => "fit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Track,
    Route,
    Activity,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Track => "track",
            TrackKind::Route => "route",
            TrackKind::Activity => "activity",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTrack {
    pub points: Vec<GeoPoint>,
    pub kind: TrackKind,
    pub file_format: FileFormat,
}

impl ParsedTrack {
    pub fn elevation_coverage(&self) -> usize {
        self.points.iter().filter(|p| p.elevation.is_some()).count()
    }
}
