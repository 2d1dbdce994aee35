use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::commands::for_each_document;
use crate::store::{self, TrailFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub lat: (f64, f64),
    pub lon: (f64, f64),
    /// Feet: Death Valley to Denali.
    pub elevation: (f64, f64),
    pub distance: (f64, f64),
    pub distance_warning: f64,
    pub gain: (f64, f64),
    pub gain_warning: f64,
    pub verification_max_age_days: i64,
    pub verification_warning_age_days: i64,
    pub required_fields: Vec<&'static str>,
    pub recommended_fields: Vec<&'static str>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            lat: (18.0, 72.0),
            lon: (-180.0, -65.0),
            elevation: (-282.0, 20320.0),
            distance: (0.1, 50.0),
            distance_warning: 30.0,
            gain: (0.0, 15000.0),
            gain_warning: 10000.0,
            verification_max_age_days: 547,
            verification_warning_age_days: 365,
            required_fields: vec!["name", "slug", "lat", "lon", "elevation", "state_slug"],
            recommended_fields: vec![
                "generated_description",
                "mountain_hero",
                "seo.meta_title",
                "seo.meta_description",
                "data_sources",
            ],
        }
    }
}

fn nested<'a>(doc: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(doc, |current, key| current.get(key))
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn nonzero_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| *v != 0.0)
}

fn outside(value: f64, (min, max): (f64, f64)) -> bool {
    value < min || value > max
}

pub fn validate_document(doc: &Value, rules: &ValidationRules, today: NaiveDate) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in &rules.required_fields {
        if !is_present(nested(doc, field)) {
            issues.push(ValidationIssue::error(
                *field,
                format!("Missing required field: {field}"),
            ));
        }
    }
    for field in &rules.recommended_fields {
        if !is_present(nested(doc, field)) {
            issues.push(ValidationIssue::warning(
                *field,
                format!("Missing recommended field: {field}"),
            ));
        }
    }

    if let Some(lat) = nonzero_number(doc.get("lat")) {
        if outside(lat, rules.lat) {
            issues.push(ValidationIssue::error(
                "lat",
                format!(
                    "Latitude {lat} is out of valid range ({} to {})",
                    rules.lat.0, rules.lat.1
                ),
            ));
        }
    }
    if let Some(lon) = nonzero_number(doc.get("lon")) {
        if outside(lon, rules.lon) {
            issues.push(ValidationIssue::error(
                "lon",
                format!(
                    "Longitude {lon} is out of valid range ({} to {})",
                    rules.lon.0, rules.lon.1
                ),
            ));
        }
    }
    if let Some(elevation) = nonzero_number(doc.get("elevation")) {
        if outside(elevation, rules.elevation) {
            issues.push(ValidationIssue::error(
                "elevation",
                format!(
                    "Elevation {elevation} ft is unrealistic ({} to {})",
                    rules.elevation.0, rules.elevation.1
                ),
            ));
        }
        if elevation % 100.0 == 0.0 && elevation > 1000.0 {
            issues.push(ValidationIssue::warning(
                "elevation",
                format!(
                    "Elevation {elevation} ft is rounded to nearest 100 - may not be precise. Verify with USGS benchmark."
                ),
            ));
        }
    }

    if let Some(trails) = doc.get("trails").and_then(Value::as_array) {
        for (idx, trail) in trails.iter().enumerate() {
            let stats = trail.get("stats");
            if let Some(distance) = nonzero_number(stats.and_then(|s| s.get("distance"))) {
                let field = format!("trails[{idx}].stats.distance");
                if outside(distance, rules.distance) {
                    issues.push(ValidationIssue::error(
                        field.clone(),
                        format!("Trail distance {distance} mi is out of range"),
                    ));
                }
                if distance > rules.distance_warning {
                    issues.push(ValidationIssue::warning(
                        field,
                        format!("Trail distance {distance} mi is very long - verify accuracy"),
                    ));
                }
            }
            if let Some(gain) = nonzero_number(stats.and_then(|s| s.get("gain"))) {
                let field = format!("trails[{idx}].stats.gain");
                if outside(gain, rules.gain) {
                    issues.push(ValidationIssue::error(
                        field.clone(),
                        format!("Elevation gain {gain} ft is unrealistic"),
                    ));
                }
                if gain > rules.gain_warning {
                    issues.push(ValidationIssue::warning(
                        field,
                        format!("Elevation gain {gain} ft is extreme - verify accuracy"),
                    ));
                }
            }
        }
    }

    match doc.get("data_sources") {
        None | Some(Value::Null) => issues.push(ValidationIssue::warning(
            "data_sources",
            "CRITICAL: No data_sources object - cannot verify authenticity",
        )),
        Some(sources) => validate_sources(sources, rules, today, &mut issues),
    }

    issues
}

fn validate_sources(
    sources: &Value,
    rules: &ValidationRules,
    today: NaiveDate,
    issues: &mut Vec<ValidationIssue>,
) {
    if !is_present(sources.get("verified_by")) {
        issues.push(ValidationIssue::warning(
            "data_sources.verified_by",
            "Missing source attribution (e.g., \"National Park Service\")",
        ));
    }
    if !is_present(sources.get("primary_url")) {
        issues.push(ValidationIssue::warning(
            "data_sources.primary_url",
            "Missing primary_url - need link to official source",
        ));
    }

    const FIELD: &str = "data_sources.verification_date";
    let Some(date) = sources
        .get("verification_date")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    else {
        issues.push(ValidationIssue::warning(
            FIELD,
            "Missing verification_date - when was this data last checked?",
        ));
        return;
    };

    let Ok(verified) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        issues.push(ValidationIssue::warning(
            FIELD,
            format!("Unparseable verification_date {date:?} - expected YYYY-MM-DD"),
        ));
        return;
    };

    let age = (today - verified).num_days();
    if age > rules.verification_max_age_days {
        issues.push(ValidationIssue::error(
            FIELD,
            format!("Data verified {age} days ago ({date}) - TOO OLD. Re-verify required."),
        ));
    } else if age > rules.verification_warning_age_days {
        issues.push(ValidationIssue::warning(
            FIELD,
            format!("Data verified {age} days ago - consider re-verifying soon"),
        ));
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileValidation {
    pub file: String,
    pub trail: String,
    pub issues: Vec<ValidationIssue>,
}

impl FileValidation {
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub total_files: usize,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub files: Vec<FileValidation>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }

    fn record(&mut self, entry: FileValidation) {
        self.total_files += 1;
        if entry.issues.is_empty() {
            self.passed += 1;
            return;
        }
        if entry.has_errors() {
            self.errors += 1;
        } else {
            self.warnings += 1;
        }
        self.files.push(entry);
    }
}

pub fn validate_files(files: &[TrailFile], rules: &ValidationRules, today: NaiveDate) -> ValidationReport {
    let results = for_each_document(files, |file| {
        let doc: Value = store::read_json(&file.path)?;
        Ok(FileValidation {
            file: file.relative(),
            trail: doc
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("UNKNOWN")
                .to_string(),
            issues: validate_document(&doc, rules, today),
        })
    });

    let mut report = ValidationReport::default();
    for entry in results {
        match entry.result {
            Ok(validation) => report.record(validation),
            Err(err) => report.record(FileValidation {
                file: entry.file.relative(),
                trail: "UNKNOWN".to_string(),
                issues: vec![ValidationIssue::error("file", format!("Parse error: {err}"))],
            }),
        }
    }
    report
}

pub fn print_report(report: &ValidationReport) {
    let rule = "=".repeat(80);
    println!("{rule}");
    println!("TRAIL DATA VALIDATION REPORT");
    println!("{rule}");
    println!("Total Files: {}", report.total_files);
    println!("Passed: {}", report.passed);
    println!("Warnings: {}", report.warnings);
    println!("Errors: {}", report.errors);
    println!("{rule}");

    if !report.files.is_empty() {
        println!();
        println!("DETAILED ISSUES:");
        for item in &report.files {
            println!();
            println!("{} ({})", item.file, item.trail);
            for issue in &item.issues {
                let label = match issue.severity {
                    Severity::Error => "ERROR",
                    Severity::Warning => "WARN ",
                };
                println!("   {label} [{}] {}", issue.field, issue.message);
            }
        }
    }

    let missing_sources = report
        .files
        .iter()
        .filter(|f| f.issues.iter().any(|i| i.field == "data_sources"))
        .count();
    let stale = report
        .files
        .iter()
        .filter(|f| {
            f.issues.iter().any(|i| {
                i.field == "data_sources.verification_date" && i.severity == Severity::Error
            })
        })
        .count();

    println!();
    println!("{rule}");
    if missing_sources > 0 {
        println!("{missing_sources} trails missing data_sources attribution");
    }
    if stale > 0 {
        println!("{stale} trails have outdated verification (>18 months)");
    }
    if report.errors > 0 {
        println!("VALIDATION FAILED - Fix errors before deployment");
    } else if report.warnings > 0 {
        println!("VALIDATION PASSED WITH WARNINGS - Review recommended");
    } else {
        println!("ALL CHECKS PASSED");
    }
}
