use serde_json::{json, Map, Value};

use crate::commands::{for_each_document, FileResult};
use crate::error::AppError;
use crate::store::{self, TrailFile};

pub const DEFAULT_DIFFICULTY: &str = "Moderate";
const IDENTITY_FIELDS: [&str; 4] = ["name", "slug", "state", "state_slug"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOutcome {
    pub modified: bool,
    pub notes: Vec<String>,
    pub missing_trails: bool,
}

/// Repairs the fields the site's listing pages rely on: slug, tags and a
/// difficulty on the first trail.
pub fn normalize_document(doc: &mut Value) -> Result<NormalizeOutcome, AppError> {
    let mut outcome = NormalizeOutcome::default();
    let root = doc
        .as_object_mut()
        .ok_or_else(|| AppError::Failed("document root is not an object".to_string()))?;

    for field in IDENTITY_FIELDS {
        if is_blank(root.get(field)) {
            outcome.notes.push(format!("Missing or empty {field}"));
            if field == "slug" {
                if let Some(name) = root.get("name").and_then(Value::as_str) {
                    let slug = slugify(name);
                    outcome.notes.push(format!("Generated slug: {slug}"));
                    root.insert("slug".to_string(), Value::String(slug));
                    outcome.modified = true;
                }
            }
        }
    }

    let tags_valid = matches!(root.get("tags"), Some(Value::Array(tags)) if !tags.is_empty());
    if !tags_valid {
        let state = root
            .get("state_slug")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("hiking")
            .to_string();
        outcome.notes.push("Invalid tags, adding default".to_string());
        root.insert("tags".to_string(), json!([state, "hiking", "trail"]));
        outcome.modified = true;
    }

    let cleaned = match root.get("tags") {
        Some(Value::Array(tags)) => {
            let cleaned: Vec<Value> = tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(|tag| Value::String(tag.to_lowercase()))
                .collect();
            (cleaned != *tags).then_some(cleaned)
        }
        _ => None,
    };
    if let Some(cleaned) = cleaned {
        outcome.notes.push(format!("Cleaned tags: {}", Value::Array(cleaned.clone())));
        root.insert("tags".to_string(), Value::Array(cleaned));
        outcome.modified = true;
    }

    let trail = match root.get_mut("trails") {
        Some(Value::Array(trails)) => trails.first_mut(),
        _ => None,
    };
    let Some(trail) = trail.and_then(Value::as_object_mut) else {
        outcome.notes.push("Missing trails array".to_string());
        outcome.missing_trails = true;
        return Ok(outcome);
    };

    if !trail.get("stats").map(Value::is_object).unwrap_or(false) {
        outcome.notes.push("Missing stats in trail".to_string());
        trail.insert(
            "stats".to_string(),
            json!({
                "distance": 0,
                "gain": 0,
                "difficulty": DEFAULT_DIFFICULTY,
                "time": 0
            }),
        );
        outcome.modified = true;
    }

    if let Some(stats) = trail.get_mut("stats").and_then(Value::as_object_mut) {
        if normalize_difficulty(stats) {
            outcome.notes.push("Missing or untrimmed difficulty".to_string());
            outcome.modified = true;
        }
    }

    Ok(outcome)
}

fn normalize_difficulty(stats: &mut Map<String, Value>) -> bool {
    let current = match stats.get("difficulty") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let trimmed = current.trim();
    let normalized = if trimmed.is_empty() {
        DEFAULT_DIFFICULTY
    } else {
        trimmed
    };
    if stats.get("difficulty").and_then(Value::as_str) == Some(normalized) {
        return false;
    }
    stats.insert(
        "difficulty".to_string(),
        Value::String(normalized.to_string()),
    );
    true
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "-")
}

pub fn normalize_files(files: &[TrailFile]) -> Vec<FileResult<bool>> {
    for_each_document(files, |file| {
        let mut doc: Value = store::read_json(&file.path)?;
        let outcome = normalize_document(&mut doc)?;
        for note in &outcome.notes {
            tracing::info!(file = %file.relative(), "{}", note);
        }
        if outcome.missing_trails {
            return Err(AppError::missing(file.path.clone(), "trails"));
        }
        if outcome.modified {
            store::write_json(&file.path, &doc)?;
        }
        Ok(outcome.modified)
    })
}
