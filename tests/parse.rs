use trailgeo::error::ParseError;
use trailgeo::pipeline::parse::parse;
use trailgeo::types::track::{FileFormat, TrackKind, FEET_PER_METER};

fn gpx_11_track() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><name>Half Dome</name></metadata>
  <trk><name>Half Dome</name><trkseg>
    <trkpt lat="37.7325" lon="-119.5580"><ele>1230.0</ele><time>2026-05-01T07:00:00Z</time></trkpt>
    <trkpt lat="37.7330" lon="-119.5570"><ele>1240.0</ele></trkpt>
    <trkpt lat="37.7338" lon="-119.5561"><ele>1255.5</ele></trkpt>
  </trkseg></trk>
</gpx>"#
}

fn gpx_10_route() -> &'static str {
    r#"<?xml version="1.0"?>
<gpx version="1.0" creator="test" xmlns="http://www.topografix.com/GPX/1/0">
  <rte><name>Mount Washington</name>
    <rtept lat="44.2570" lon="-71.2530"><ele>616</ele></rtept>
    <rtept lat="44.2650" lon="-71.2840"/>
  </rte>
</gpx>"#
}

#[test]
fn parses_namespaced_gpx_11_track_in_feet() {
    let track = parse(gpx_11_track().as_bytes(), FileFormat::Gpx).expect("parse");
    assert_eq!(track.kind, TrackKind::Track);
    assert_eq!(track.file_format, FileFormat::Gpx);
    assert_eq!(track.points.len(), 3);
    assert_eq!(track.points[0].lat, 37.7325);
    assert_eq!(track.points[0].lon, -119.5580);

    let ele = track.points[0].elevation.expect("ele");
    assert!((ele - 1230.0 * FEET_PER_METER).abs() < 1e-9);
    assert_eq!(track.elevation_coverage(), 3);
}

#[test]
fn falls_back_to_gpx_10_route_points() {
    let track = parse(gpx_10_route().as_bytes(), FileFormat::Gpx).expect("parse");
    assert_eq!(track.kind, TrackKind::Route);
    assert_eq!(track.points.len(), 2);
    assert!(track.points[0].elevation.is_some());
    // self-closing point without elevation
    assert_eq!(track.points[1].elevation, None);
    assert_eq!(track.points[1].lon, -71.2840);
    assert_eq!(track.elevation_coverage(), 1);
}

#[test]
fn prefers_track_over_route() {
    let gpx = r#"<gpx version="1.1">
  <rte><rtept lat="1.0" lon="1.0"/><rtept lat="2.0" lon="2.0"/><rtept lat="3.0" lon="3.0"/></rte>
  <trk><trkseg><trkpt lat="10.0" lon="10.0"/><trkpt lat="10.1" lon="10.1"/></trkseg></trk>
</gpx>"#;
    let track = parse(gpx.as_bytes(), FileFormat::Gpx).expect("parse");
    assert_eq!(track.kind, TrackKind::Track);
    assert_eq!(track.points.len(), 2);
    assert_eq!(track.points[0].lat, 10.0);
}

#[test]
fn unparseable_elevation_is_left_empty() {
    let gpx = r#"<gpx><trk><trkseg>
  <trkpt lat="37.0" lon="-119.0"><ele>n/a</ele></trkpt>
  <trkpt lat="37.1" lon="-119.0"><ele>100</ele></trkpt>
</trkseg></trk></gpx>"#;
    let track = parse(gpx.as_bytes(), FileFormat::Gpx).expect("parse");
    assert_eq!(track.points[0].elevation, None);
    assert!(track.points[1].elevation.is_some());
}

#[test]
fn file_without_points_is_empty() {
    let gpx = r#"<gpx version="1.1"><metadata><name>nothing</name></metadata></gpx>"#;
    let err = parse(gpx.as_bytes(), FileFormat::Gpx).expect_err("empty");
    assert!(matches!(err, ParseError::EmptyFile));
}

#[test]
fn point_without_coordinates_is_rejected() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="37.0"><ele>1</ele></trkpt></trkseg></trk></gpx>"#;
    let err = parse(gpx.as_bytes(), FileFormat::Gpx).expect_err("invalid");
    assert!(matches!(err, ParseError::InvalidGpx(_)));
}

#[test]
fn mismatched_tags_are_rejected() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="37.0" lon="-119.0"></trk></trkseg></gpx>"#;
    let err = parse(gpx.as_bytes(), FileFormat::Gpx).expect_err("invalid");
    assert!(matches!(err, ParseError::InvalidGpx(_)));
}

const FIT_CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800, 0xB401,
    0x5000, 0x9C01, 0x8801, 0x4400,
];

fn fit_crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |mut crc, &byte| {
        for nibble in [byte & 0x0F, byte >> 4] {
            let tmp = FIT_CRC_TABLE[(crc & 0x0F) as usize];
            crc = (crc >> 4) & 0x0FFF;
            crc = crc ^ tmp ^ FIT_CRC_TABLE[nibble as usize];
        }
        crc
    })
}

fn semicircles(degrees: f64) -> i32 {
    (degrees * 2_147_483_648.0 / 180.0).round() as i32
}

/// A minimal activity: one record definition followed by `(lat, lon, metres)` records.
fn fit_activity(records: &[(f64, f64, f64)]) -> Vec<u8> {
    // local type 0 -> record (20): position_lat, position_long as sint32, altitude as uint16
    let mut data = vec![0x40, 0, 0, 20, 0, 3, 0, 4, 0x85, 1, 4, 0x85, 2, 2, 0x84];
    for &(lat, lon, metres) in records {
        data.push(0x00);
        data.extend_from_slice(&semicircles(lat).to_le_bytes());
        data.extend_from_slice(&semicircles(lon).to_le_bytes());
        // scale 5, offset 500
        data.extend_from_slice(&(((metres + 500.0) * 5.0) as u16).to_le_bytes());
    }

    let mut file = vec![14, 0x10];
    file.extend_from_slice(&2093u16.to_le_bytes());
    file.extend_from_slice(&(data.len() as u32).to_le_bytes());
    file.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&file);
    file.extend_from_slice(&header_crc.to_le_bytes());
    file.extend_from_slice(&data);
    let file_crc = fit_crc(&file);
    file.extend_from_slice(&file_crc.to_le_bytes());
    file
}

#[test]
fn parses_fit_records_in_feet() {
    let bytes = fit_activity(&[(37.0, -119.0, 100.0), (37.001, -119.0, 110.0), (37.002, -119.0005, 120.0)]);
    let track = parse(&bytes, FileFormat::Fit).expect("parse");
    assert_eq!(track.kind, TrackKind::Activity);
    assert_eq!(track.file_format, FileFormat::Fit);
    assert_eq!(track.points.len(), 3);
    assert!((track.points[0].lat - 37.0).abs() < 1e-6);
    assert!((track.points[2].lon + 119.0005).abs() < 1e-6);

    let ele = track.points[1].elevation.expect("ele");
    assert!((ele - 110.0 * FEET_PER_METER).abs() < 1e-6);
    assert_eq!(track.elevation_coverage(), 3);
}

#[test]
fn garbage_is_not_a_fit_file() {
    let err = parse(b"definitely not a fit file", FileFormat::Fit).expect_err("invalid");
    assert!(matches!(err, ParseError::InvalidFit(_)));
}

#[test]
fn format_follows_extension() {
    assert_eq!(FileFormat::from_filename("ride.GPX"), Some(FileFormat::Gpx));
    assert_eq!(FileFormat::from_filename("ride.fit"), Some(FileFormat::Fit));
    assert_eq!(FileFormat::from_filename("ride.kml"), None);
}
