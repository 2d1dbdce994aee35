use serde::{Deserialize, Serialize};

pub const GOOD_POINTS_PER_MILE: f64 = 15.0;
pub const FAIR_POINTS_PER_MILE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DensityClass {
    Good,
    Fair,
    Poor,
}

impl DensityClass {
    pub fn classify(points_per_mile: f64) -> Self {
        if points_per_mile >= GOOD_POINTS_PER_MILE {
            DensityClass::Good
        } else if points_per_mile >= FAIR_POINTS_PER_MILE {
            DensityClass::Fair
        } else {
            DensityClass::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DensityClass::Good => "GOOD",
            DensityClass::Fair => "FAIR",
            DensityClass::Poor => "POOR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub gps_points: usize,
    pub distance_mi: f64,
    pub points_per_mile: f64,
    pub quality: DensityClass,
    pub straightness: Option<f64>,
    pub has_elevation: bool,
    pub chart_points: usize,
    pub score: u8,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}
