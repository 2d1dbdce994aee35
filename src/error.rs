use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid FIT: {0}")]
    InvalidFit(String),
    #[error("No track or route points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeoError {
    #[error("Insufficient data points (need at least 2, got {0})")]
    InsufficientPoints(usize),
    #[error("Point {index} has no elevation; backfill elevation first")]
    MissingElevation { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid field in {path}: {source}")]
    InvalidField {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid argument: {0}")]
    BadArgument(String),
    #[error("{0}")]
    Failed(String),
}

impl AppError {
    pub fn missing(path: impl Into<PathBuf>, field: &'static str) -> Self {
        AppError::Store(StoreError::MissingField {
            path: path.into(),
            field,
        })
    }

    pub fn at(self, path: &std::path::Path) -> Self {
        match self {
            AppError::Store(StoreError::MissingField { field, .. }) => Self::missing(path, field),
            other => other,
        }
    }
}
