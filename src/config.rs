use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, StoreError};
use crate::pipeline::chart::DEFAULT_CHART_POINTS;
use crate::pipeline::densify::DensifyOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub report_path: PathBuf,
    pub toolkit: ToolkitConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("TRAILGEO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("website/src/data"));

        let report_path = std::env::var("TRAILGEO_REPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("gps-audit-report.json"));

        Self {
            data_dir,
            report_path,
            toolkit: ToolkitConfig::default(),
        }
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let mut config = Self::from_env();
        let file = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("TRAILGEO_CONFIG").ok().map(PathBuf::from));
        if let Some(path) = file {
            config.toolkit = ToolkitConfig::from_file(&path)?;
            tracing::debug!("Loaded toolkit config from {}", path.display());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    pub densify: DensifyOptions,
    pub chart_points: usize,
    pub import_max_points: usize,
    pub synthesis: SynthesisOptions,
    pub elevation: ElevationModel,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            densify: DensifyOptions::default(),
            chart_points: DEFAULT_CHART_POINTS,
            import_max_points: 100,
            synthesis: SynthesisOptions::default(),
            elevation: ElevationModel::default(),
        }
    }
}

impl ToolkitConfig {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub points_per_mile: f64,
    pub min_points: usize,
    pub fallback_distance_mi: f64,
    pub fallback_gain_ft: f64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            points_per_mile: 20.0,
            min_points: 10,
            fallback_distance_mi: 1.0,
            fallback_gain_ft: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationModel {
    pub default_base_ft: f64,
    pub default_gain_ft: f64,
    pub landmarks: Vec<LandmarkElevation>,
}

impl Default for ElevationModel {
    fn default() -> Self {
        Self {
            default_base_ft: 4000.0,
            default_gain_ft: 2000.0,
            landmarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkElevation {
    pub keyword: String,
    pub base_ft: f64,
}

impl ElevationModel {
    pub fn base_elevation(&self, trail_name: &str) -> f64 {
        let name = trail_name.to_lowercase();
        self.landmarks
            .iter()
            .find(|landmark| name.contains(&landmark.keyword.to_lowercase()))
            .map(|landmark| landmark.base_ft)
            .unwrap_or(self.default_base_ft)
    }
}
