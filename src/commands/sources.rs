use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::commands::{for_each_document, FileResult};
use crate::error::AppError;
use crate::store::{self, TrailFile};
use crate::types::trail::DataSources;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTable {
    pub states: BTreeMap<String, Vec<SourceRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRule {
    /// Any of these in the lower-cased trail name selects the rule. Empty
    /// makes it the state's default.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub source: SourceTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTemplate {
    pub verified_by: String,
    pub primary_url: String,
    pub elevation_source: String,
    pub gps_source: String,
    pub distance_source: String,
    pub notes: String,
}

impl SourceTable {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        Ok(store::read_json(path)?)
    }

    pub fn select(&self, state_slug: &str, trail_name: &str) -> Option<&SourceTemplate> {
        let rules = self.states.get(state_slug)?;
        let name = trail_name.to_lowercase();

        rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| name.contains(&keyword.to_lowercase()))
            })
            .or_else(|| rules.iter().find(|rule| rule.keywords.is_empty()))
            .map(|rule| &rule.source)
    }
}

impl SourceTemplate {
    pub fn to_data_sources(&self, verification_date: &str) -> DataSources {
        DataSources {
            verified_by: Some(self.verified_by.clone()),
            primary_url: Some(self.primary_url.clone()),
            verification_date: Some(verification_date.to_string()),
            elevation_source: Some(self.elevation_source.clone()),
            gps_source: Some(self.gps_source.clone()),
            distance_source: Some(self.distance_source.clone()),
            notes: Some(self.notes.clone()),
            extra: Map::new(),
        }
    }
}

/// Returns `true` when a provenance block was added. Existing blocks are
/// never overwritten and nothing else in the document is touched.
pub fn attach_sources(
    doc: &mut Value,
    state_slug: &str,
    table: &SourceTable,
    verification_date: &str,
) -> Result<bool, AppError> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let root = doc
        .as_object_mut()
        .ok_or_else(|| AppError::Failed("document root is not an object".to_string()))?;
    if !matches!(root.get("data_sources"), None | Some(Value::Null)) {
        return Ok(false);
    }
    let Some(template) = table.select(state_slug, &name) else {
        tracing::warn!("No source template for {} ({})", name, state_slug);
        return Ok(false);
    };

    let sources = serde_json::to_value(template.to_data_sources(verification_date))
        .map_err(|err| AppError::Failed(err.to_string()))?;
    root.insert("data_sources".to_string(), sources);
    Ok(true)
}

pub fn attach_sources_to_files(
    files: &[TrailFile],
    table: &SourceTable,
    verification_date: &str,
) -> Vec<FileResult<bool>> {
    for_each_document(files, |file| {
        let mut doc: Value = store::read_json(&file.path)?;
        if !attach_sources(&mut doc, &file.state_slug, table, verification_date)? {
            return Ok(false);
        }
        store::write_json(&file.path, &doc)?;
        tracing::info!("Added data_sources to {}", file.relative());
        Ok(true)
    })
}
