use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::trail::TrailDocument;

const NON_STATE_DIRS: &[&str] = &["blog"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailFile {
    pub state_slug: String,
    pub path: PathBuf,
}

impl TrailFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn relative(&self) -> String {
        format!("{}/{}", self.state_slug, self.file_name())
    }
}

pub fn discover(data_dir: &Path) -> Result<Vec<TrailFile>, StoreError> {
    let mut files = Vec::new();

    for state_dir in sorted_entries(data_dir)? {
        if !state_dir.is_dir() {
            continue;
        }
        let state_slug = match state_dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if NON_STATE_DIRS.contains(&state_slug.as_str()) {
            continue;
        }

        for path in sorted_entries(&state_dir)? {
            let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
            if path.is_file() && is_json {
                files.push(TrailFile {
                    state_slug: state_slug.clone(),
                    path,
                });
            }
        }
    }

    tracing::debug!("Discovered {} trail files under {}", files.len(), data_dir.display());
    Ok(files)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let io_err = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| classify(path, source))
}

pub fn decode<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|source| classify(path, source))
}

fn classify(path: &Path, source: serde_json::Error) -> StoreError {
    match source.classify() {
        Category::Data => StoreError::InvalidField {
            path: path.to_path_buf(),
            source,
        },
        _ => StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Copies the primary trail and provenance of `doc` back into `raw`. Every
/// other trail and top-level field keeps the exact JSON it was read with.
pub fn merge_primary_trail(path: &Path, raw: &mut Value, doc: &TrailDocument) -> Result<(), StoreError> {
    let encode = |value: Result<Value, serde_json::Error>| {
        value.map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    };

    let slot = raw
        .get_mut("trails")
        .and_then(Value::as_array_mut)
        .and_then(|trails| trails.first_mut());
    if let (Some(slot), Some(trail)) = (slot, doc.primary_trail()) {
        *slot = encode(serde_json::to_value(trail))?;
    }

    if let (Some(root), Some(sources)) = (raw.as_object_mut(), doc.data_sources.as_ref()) {
        root.insert("data_sources".to_string(), encode(serde_json::to_value(sources))?);
    }
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
