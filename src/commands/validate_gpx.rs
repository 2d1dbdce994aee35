use serde::Serialize;

use crate::pipeline::metrics::{points_per_mile, total_distance};
use crate::types::quality::{DensityClass, GOOD_POINTS_PER_MILE};
use crate::types::track::{ParsedTrack, TrackKind};

pub const EXCELLENT_POINTS_PER_MILE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GpxGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl GpxGrade {
    pub fn from_density(points_per_mile: f64) -> Self {
        if points_per_mile >= EXCELLENT_POINTS_PER_MILE {
            return GpxGrade::Excellent;
        }
        match DensityClass::classify(points_per_mile) {
            DensityClass::Good => GpxGrade::Good,
            DensityClass::Fair => GpxGrade::Fair,
            DensityClass::Poor => GpxGrade::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GpxGrade::Excellent => "EXCELLENT",
            GpxGrade::Good => "GOOD",
            GpxGrade::Fair => "FAIR",
            GpxGrade::Poor => "POOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationCoverage {
    Complete,
    Partial,
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct GpxValidation {
    pub kind: TrackKind,
    pub points: usize,
    pub points_with_elevation: usize,
    pub elevation_percent: f64,
    pub elevation: ElevationCoverage,
    pub distance_mi: f64,
    pub grade: Option<GpxGrade>,
    pub points_per_mile: f64,
}

impl GpxValidation {
    /// FAIR and better can be converted; POOR or unmeasurable cannot.
    pub fn is_usable(&self) -> bool {
        matches!(
            self.grade,
            Some(GpxGrade::Excellent) | Some(GpxGrade::Good) | Some(GpxGrade::Fair)
        )
    }
}

pub fn validate_track(track: &ParsedTrack) -> GpxValidation {
    let points = track.points.len();
    let points_with_elevation = track.elevation_coverage();
    let elevation_percent = if points > 0 {
        points_with_elevation as f64 / points as f64 * 100.0
    } else {
        0.0
    };
    let elevation = if elevation_percent >= 95.0 {
        ElevationCoverage::Complete
    } else if elevation_percent >= 50.0 {
        ElevationCoverage::Partial
    } else {
        ElevationCoverage::Missing
    };

    let distance_mi = total_distance(&track.points);
    let density = points_per_mile(points, distance_mi);
    let grade = (!density.zero_distance).then(|| GpxGrade::from_density(density.points_per_mile));

    GpxValidation {
        kind: track.kind,
        points,
        points_with_elevation,
        elevation_percent,
        elevation,
        distance_mi,
        grade,
        points_per_mile: density.points_per_mile,
    }
}

pub fn print_validation(source: &str, validation: &GpxValidation) {
    let rule = "=".repeat(60);
    println!("Validating: {source}");
    println!("{rule}");
    println!(
        "Found {} GPS points ({})",
        validation.points,
        validation.kind.as_str()
    );

    let coverage = format!(
        "({}/{} points = {:.0}%)",
        validation.points_with_elevation, validation.points, validation.elevation_percent
    );
    match validation.elevation {
        ElevationCoverage::Complete => println!("Has elevation data {coverage}"),
        ElevationCoverage::Partial => println!("Partial elevation data {coverage}"),
        ElevationCoverage::Missing => println!("Missing elevation data {coverage}"),
    }
    println!("Trail distance: {:.1} miles", validation.distance_mi);

    let Some(grade) = validation.grade else {
        println!("Cannot calculate distance (points too close)");
        return;
    };
    println!(
        "GPS density: {:.1} points/mile ({})",
        validation.points_per_mile,
        grade.as_str()
    );
    println!();
    println!("{rule}");
    match grade {
        GpxGrade::Excellent | GpxGrade::Good => {
            println!("GPX FILE IS READY FOR CONVERSION");
            println!("{rule}");
            println!("This GPX will produce {} quality trail data.", grade.as_str());
        }
        GpxGrade::Fair => {
            println!("GPX FILE IS USABLE BUT NOT IDEAL");
            println!("{rule}");
            println!("This GPX will work, but consider finding a more detailed version.");
        }
        GpxGrade::Poor => {
            println!("GPX FILE QUALITY TOO LOW");
            println!("{rule}");
            println!("This GPX is too simplified. Please find a more detailed version.");
            println!(
                "Recommended: {}+ points/mile, Current: {:.1} points/mile",
                GOOD_POINTS_PER_MILE, validation.points_per_mile
            );
        }
    }
    println!();
}
