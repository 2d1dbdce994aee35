use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commands::for_each_document;
use crate::error::{AppError, StoreError};
use crate::pipeline::metrics::assess_quality;
use crate::store::{self, TrailFile};
use crate::types::geo::round_to;
use crate::types::quality::DensityClass;
use crate::types::trail::TrailDocument;

pub const GOOD_SCORE: u8 = 80;
pub const FAIR_SCORE: u8 = 50;
const CRITICAL_LISTED: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub name: String,
    pub state: String,
    pub state_slug: String,
    pub file: String,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub quality_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AuditStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    pub gps_points: usize,
    pub distance_mi: f64,
    pub points_per_mile: f64,
    pub has_elevation: bool,
    pub chart_points: usize,
    pub quality: DensityClass,
}

impl AuditResult {
    fn failed(file: &TrailFile, name: &str, issue: String) -> Self {
        Self {
            name: name.to_string(),
            state: "Unknown".to_string(),
            state_slug: file.state_slug.clone(),
            file: file.file_name(),
            issues: vec![issue],
            warnings: Vec::new(),
            quality_score: 0,
            stats: None,
        }
    }
}

pub fn audit_document(doc: &TrailDocument, file: &TrailFile) -> AuditResult {
    let mut result = AuditResult {
        name: doc.display_name().to_string(),
        state: doc.state.clone().unwrap_or_else(|| "Unknown".to_string()),
        state_slug: file.state_slug.clone(),
        file: file.file_name(),
        issues: Vec::new(),
        warnings: Vec::new(),
        quality_score: 100,
        stats: None,
    };

    let Some(trail) = doc.primary_trail() else {
        result.issues.push("No trails array found".to_string());
        result.quality_score = 0;
        return result;
    };
    let Some(geo) = trail.geo.as_ref() else {
        result.issues.push("No geo object".to_string());
        result.quality_score = 0;
        return result;
    };
    let path = match geo.path.as_deref() {
        Some(path) if !path.is_empty() => path,
        _ => {
            result.issues.push("No GPS path data".to_string());
            result.quality_score = 0;
            return result;
        }
    };

    let distance_hint = trail
        .stats
        .as_ref()
        .map(|stats| stats.distance_or_zero())
        .unwrap_or(0.0);
    let chart_len = geo.chart.as_ref().map(Vec::len).unwrap_or(0);
    let assessment = assess_quality(path, distance_hint, chart_len, geo.markers.is_some());

    result.stats = Some(AuditStats {
        gps_points: assessment.gps_points,
        distance_mi: round_to(assessment.distance_mi, 1),
        points_per_mile: round_to(assessment.points_per_mile, 1),
        has_elevation: assessment.has_elevation,
        chart_points: assessment.chart_points,
        quality: assessment.quality,
    });
    result.quality_score = assessment.score;
    result.issues = assessment.issues;
    result.warnings = assessment.warnings;
    result
}

pub fn audit_file(file: &TrailFile) -> AuditResult {
    let raw: Value = match store::read_json(&file.path) {
        Ok(raw) => raw,
        Err(StoreError::Malformed { .. }) => {
            tracing::warn!(file = %file.relative(), "Invalid JSON");
            return AuditResult::failed(file, "Parse Error", "Invalid JSON".to_string());
        }
        Err(err) => {
            tracing::warn!(file = %file.relative(), "{}", err);
            return AuditResult::failed(file, "Error", format!("Error: {}", err));
        }
    };
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    match store::decode::<TrailDocument>(&file.path, raw) {
        Ok(doc) => audit_document(&doc, file),
        Err(StoreError::InvalidField { source, .. }) => {
            tracing::warn!(file = %file.relative(), "Invalid field: {}", source);
            AuditResult::failed(file, &name, format!("Invalid field: {}", source))
        }
        Err(err) => AuditResult::failed(file, &name, format!("Error: {}", err)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub results: Vec<AuditResult>,
    pub summary: AuditSummary,
}

impl AuditReport {
    pub fn new(mut results: Vec<AuditResult>) -> Self {
        results.sort_by_key(|r| r.quality_score);
        let mut summary = AuditSummary {
            total: results.len(),
            ..Default::default()
        };
        for r in &results {
            match r.quality_score {
                s if s >= GOOD_SCORE => summary.good += 1,
                s if s >= FAIR_SCORE => summary.fair += 1,
                _ => summary.poor += 1,
            }
        }
        Self { results, summary }
    }

    pub fn needs_fix(&self) -> impl Iterator<Item = &AuditResult> {
        self.results.iter().filter(|r| r.quality_score < GOOD_SCORE)
    }

    pub fn critical(&self) -> impl Iterator<Item = &AuditResult> {
        self.results
            .iter()
            .filter(|r| r.quality_score < FAIR_SCORE)
            .take(CRITICAL_LISTED)
    }

    pub fn export(&self, path: &Path) -> Result<(), AppError> {
        store::write_json(path, &self.results)?;
        Ok(())
    }
}

pub fn audit_all(files: &[TrailFile]) -> AuditReport {
    let results = for_each_document(files, |file| Ok(audit_file(file)))
        .into_iter()
        .filter_map(|entry| entry.result.ok())
        .collect();
    AuditReport::new(results)
}

pub fn print_report(report: &AuditReport) {
    let rule = "=".repeat(80);
    println!("{rule}");
    println!("GPS DATA QUALITY AUDIT REPORT");
    println!("{rule}");
    println!();
    println!("Total trails analyzed: {}", report.summary.total);
    println!("  GOOD (80-100): {} trails", report.summary.good);
    println!("  FAIR (50-79):  {} trails", report.summary.fair);
    println!("  POOR (<50):    {} trails", report.summary.poor);
    println!();

    let needs_fix: Vec<_> = report.needs_fix().collect();
    if !needs_fix.is_empty() {
        println!("{rule}");
        println!("TRAILS NEEDING GPS DATA FIXES");
        println!("{rule}");
        println!();

        for result in needs_fix {
            println!("{} ({})", result.name, result.state);
            println!("   File: {}", result.file);
            println!("   Quality Score: {}/100", result.quality_score);
            if let Some(stats) = &result.stats {
                println!(
                    "   GPS Points: {} ({} pts/mi)",
                    stats.gps_points, stats.points_per_mile
                );
                println!("   Distance: {} mi", stats.distance_mi);
                println!("   Quality: {}", stats.quality.as_str());
            }
            if !result.issues.is_empty() {
                println!("   Issues:");
                for issue in &result.issues {
                    println!("      - {issue}");
                }
            }
            if !result.warnings.is_empty() {
                println!("   Warnings:");
                for warning in &result.warnings {
                    println!("      - {warning}");
                }
            }
            println!();
        }
    }

    let critical: Vec<_> = report.critical().collect();
    if !critical.is_empty() {
        println!("{rule}");
        println!("CRITICAL: HIGHEST PRIORITY FIXES");
        println!("{rule}");
        println!();
        for result in critical {
            let ppm = result.stats.as_ref().map(|s| s.points_per_mile).unwrap_or(0.0);
            println!(
                "{:40} {:5.1} pts/mi (score: {}/100)",
                result.name, ppm, result.quality_score
            );
        }
        println!();
    }
}
