pub mod audit;
pub mod enhance;
pub mod import;
pub mod normalize;
pub mod sources;
pub mod synthesize;
pub mod validate;
pub mod validate_gpx;

use rayon::prelude::*;

use crate::error::AppError;
use crate::store::TrailFile;

pub struct FileResult<T> {
    pub file: TrailFile,
    pub result: Result<T, AppError>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Applies `op` to every file independently. A failing document is logged
/// and counted; it never stops its siblings. Results keep discovery order.
pub fn for_each_document<T, F>(files: &[TrailFile], op: F) -> Vec<FileResult<T>>
where
    T: Send,
    F: Fn(&TrailFile) -> Result<T, AppError> + Sync,
{
    files
        .par_iter()
        .map(|file| {
            let result = op(file);
            if let Err(err) = &result {
                tracing::warn!(file = %file.relative(), "{}", err);
            }
            FileResult {
                file: file.clone(),
                result,
            }
        })
        .collect()
}

pub fn summarize(results: &[FileResult<bool>]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for entry in results {
        summary.processed += 1;
        match entry.result {
            Ok(true) => summary.changed += 1,
            Ok(false) => summary.unchanged += 1,
            Err(_) => summary.failed += 1,
        }
    }
    summary
}
