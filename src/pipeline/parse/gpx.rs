use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::geo::GeoPoint;
use crate::types::track::{FileFormat, ParsedTrack, TrackKind, FEET_PER_METER};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedTrack, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut track_points = Vec::new();
        let mut route_points = Vec::new();
        let mut current: Option<(GeoPoint, TrackKind)> = None;
        let mut in_ele = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"trkpt" => current = Some((read_position(&e)?, TrackKind::Track)),
                    b"rtept" => current = Some((read_position(&e)?, TrackKind::Route)),
                    b"ele" if current.is_some() => in_ele = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"trkpt" => track_points.push(read_position(&e)?),
                    b"rtept" => route_points.push(read_position(&e)?),
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_ele {
                        if let Some((point, _)) = current.as_mut() {
                            let text = e
                                .unescape()
                                .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                            point.elevation = text
                                .trim()
                                .parse::<f64>()
                                .ok()
                                .map(|meters| meters * FEET_PER_METER);
                        }
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"ele" => in_ele = false,
                    b"trkpt" | b"rtept" => match current.take() {
                        Some((point, TrackKind::Route)) => route_points.push(point),
                        Some((point, _)) => track_points.push(point),
                        None => {}
                    },
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        // Tracks are the recorded trace; routes are only the fallback.
        let (points, kind) = if !track_points.is_empty() {
            (track_points, TrackKind::Track)
        } else if !route_points.is_empty() {
            (route_points, TrackKind::Route)
        } else {
            return Err(ParseError::EmptyFile);
        };

        Ok(ParsedTrack {
            points,
            kind,
            file_format: FileFormat::Gpx,
        })
    }
}

fn read_position(e: &BytesStart) -> Result<GeoPoint, ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match attr.key.local_name().as_ref() {
            b"lat" => lat = value.trim().parse::<f64>().ok(),
            b"lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
        _ => Err(ParseError::InvalidGpx(
            "point without numeric lat/lon attributes".to_string(),
        )),
    }
}
