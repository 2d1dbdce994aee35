use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::geo::{serialize_compact_opt, ChartPoint, GeoPoint};

/// One catalogue file. Only the fields the toolkit touches are typed; the rest
/// ride along in `extra` so a rewrite never loses page content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trails: Option<Vec<Trail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<DataSources>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrailDocument {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn primary_trail(&self) -> Option<&Trail> {
        self.trails.as_ref().and_then(|trails| trails.first())
    }

    pub fn primary_trail_mut(&mut self) -> Option<&mut Trail> {
        self.trails.as_mut().and_then(|trails| trails.first_mut())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TrailStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailStats {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub distance: Option<f64>,
    /// Feet.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrailStats {
    pub fn distance_or_zero(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<Markers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GeoPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Vec<ChartPoint>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summit: Option<GeoPoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Markers {
    pub fn from_path(path: &[GeoPoint]) -> Option<Self> {
        let (first, last) = (path.first()?, path.last()?);
        Some(Self {
            start: Some(first.position()),
            summit: Some(last.position()),
            extra: Map::new(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataSources {
    pub fn append_note(&mut self, note: &str) {
        match self.notes.as_mut() {
            Some(notes) if !notes.is_empty() => {
                notes.push(' ');
                notes.push_str(note);
            }
            _ => self.notes = Some(note.to_string()),
        }
    }
}
