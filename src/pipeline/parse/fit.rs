use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::geo::GeoPoint;
use crate::types::track::{FileFormat, ParsedTrack, TrackKind, FEET_PER_METER};
use fitparser::profile::MesgNum;

pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrack, ParseError> {
        let data = fitparser::from_bytes(bytes)
            .map_err(|e| ParseError::InvalidFit(format!("Failed to parse FIT file: {}", e)))?;

        let mut points = Vec::new();

        for record in data {
            if record.kind() != MesgNum::Record {
                continue;
            }

            let mut lat = None;
            let mut lon = None;
            let mut elevation = None;

            for field in record.fields() {
                match (field.name(), field.value()) {
                    ("position_lat", fitparser::Value::SInt32(val)) => {
                        lat = Some(semicircles_to_degrees(*val));
                    }
                    ("position_long", fitparser::Value::SInt32(val)) => {
                        lon = Some(semicircles_to_degrees(*val));
                    }
                    ("altitude" | "enhanced_altitude", fitparser::Value::Float64(val)) => {
                        elevation = Some(*val * FEET_PER_METER);
                    }
                    _ => {}
                }
            }

            if let (Some(lat), Some(lon)) = (lat, lon) {
                points.push(GeoPoint {
                    lat,
                    lon,
                    elevation,
                });
            }
        }

        if points.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParsedTrack {
            points,
            kind: TrackKind::Activity,
            file_format: FileFormat::Fit,
        })
    }
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}
