//! Raw model record → well-formed [`AnalysisResult`].
//!
//! The normalizer is pure and idempotent: feeding its own output back in
//! (serialized) reproduces the same result.

use super::types::{AnalysisResult, Breakdown, Category, InfrastructureItem, Label};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

pub const MIN_INFRASTRUCTURE: usize = 5;
pub const MAX_INFRASTRUCTURE: usize = 8;
/// Upper bound on a landmark distance. Larger values are clamped so
/// rounding and serialization stay finite.
pub const MAX_DISTANCE_KM: f64 = 1_000.0;

pub const CONNECTIVITY_WEIGHT: f64 = 0.25;
pub const HEALTHCARE_WEIGHT: f64 = 0.15;
pub const EDUCATION_WEIGHT: f64 = 0.15;
pub const RETAIL_WEIGHT: f64 = 0.15;
pub const EMPLOYMENT_WEIGHT: f64 = 0.15;

pub const DEFAULT_SUMMARY: &str =
    "Market potential assessment based on local connectivity, social infrastructure and employment access.";
pub const UNAVAILABLE_SUMMARY: &str =
    "Infrastructure data is currently unavailable for this locality.";

/// Stock filler names that say nothing about a real place. Compared on the
/// trimmed, lower-cased name.
const PLACEHOLDER_NAMES: &[&str] = &[
    "metro station",
    "metro",
    "hospital",
    "local hospital",
    "city hospital",
    "general hospital",
    "school",
    "local school",
    "public school",
    "international school",
    "mall",
    "shopping mall",
    "local mall",
    "park",
    "city park",
    "local park",
    "office",
    "office complex",
    "business park",
    "it park",
    "tech park",
    "n/a",
    "na",
    "none",
    "unknown",
    "not available",
    "placeholder",
    "example",
    "tbd",
];

/// Backfill names and distances. Each template names either `{city}` or
/// `{sector}` and is skipped when that input is blank.
const BACKFILL_TEMPLATES: &[(&str, Category, f64)] = &[
    ("{sector} Metro Station", Category::Metro, 0.8),
    ("{sector} Multispeciality Hospital", Category::Hospital, 1.5),
    ("{sector} Public School", Category::School, 1.2),
    ("{city} Central Mall", Category::Mall, 2.5),
    ("{sector} Community Park", Category::Park, 0.6),
    ("{city} Business District", Category::Office, 3.5),
];

/// Round to `decimals` places. Inputs too large to scale are returned as-is.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Numbers pass through; numeric strings are parsed; anything else is `None`.
fn as_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Distances may carry units ("1.4 km"); only the leading number counts.
fn as_distance(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+'))
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
        }
        other => as_number(other),
    };
    round_to(parsed.unwrap_or(0.0).clamp(0.0, MAX_DISTANCE_KM), 2)
}

fn sub_score(raw: Option<&Value>, field: &str) -> f64 {
    let value = raw.and_then(|b| as_number(b.get(field))).unwrap_or(0.0);
    round_to(clamp_score(value), 1)
}

pub fn normalize_breakdown(raw: Option<&Value>) -> Breakdown {
    Breakdown {
        connectivity: sub_score(raw, "connectivity"),
        healthcare: sub_score(raw, "healthcare"),
        education: sub_score(raw, "education"),
        retail: sub_score(raw, "retail"),
        employment: sub_score(raw, "employment"),
    }
}

/// The weighted formula is the only source of the overall score.
pub fn overall_score(breakdown: &Breakdown) -> f64 {
    let weighted = breakdown.connectivity * CONNECTIVITY_WEIGHT
        + breakdown.healthcare * HEALTHCARE_WEIGHT
        + breakdown.education * EDUCATION_WEIGHT
        + breakdown.retail * RETAIL_WEIGHT
        + breakdown.employment * EMPLOYMENT_WEIGHT;
    round_to(clamp_score(weighted), 1)
}

fn is_placeholder(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.is_empty() || PLACEHOLDER_NAMES.contains(&lower.as_str())
}

fn by_distance_then_name(a: &InfrastructureItem, b: &InfrastructureItem) -> Ordering {
    a.distance
        .partial_cmp(&b.distance)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
}

fn parse_item(raw: &Value) -> Option<InfrastructureItem> {
    let name = raw.get("name").and_then(Value::as_str)?.trim().to_string();
    if is_placeholder(&name) {
        return None;
    }
    let category = Category::coerce(raw.get("category").and_then(Value::as_str).unwrap_or(""));
    Some(InfrastructureItem {
        name,
        category,
        distance: as_distance(raw.get("distance")),
    })
}

pub fn normalize_infrastructure(raw: Option<&Value>, city: &str, sector: &str) -> Vec<InfrastructureItem> {
    let mut items: Vec<InfrastructureItem> = raw
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_item).collect())
        .unwrap_or_default();

    items.sort_by(by_distance_then_name);
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.name.to_lowercase()));
    items.truncate(MAX_INFRASTRUCTURE);

    if items.len() < MIN_INFRASTRUCTURE {
        for (template, category, distance) in BACKFILL_TEMPLATES {
            if items.len() >= MIN_INFRASTRUCTURE {
                break;
            }
            let subject = if template.contains("{city}") {
                city.trim()
            } else {
                sector.trim()
            };
            if subject.is_empty() {
                continue;
            }
            let name = template
                .replace("{city}", city.trim())
                .replace("{sector}", sector.trim())
                .trim()
                .to_string();
            if is_placeholder(&name) || !seen.insert(name.to_lowercase()) {
                continue;
            }
            items.push(InfrastructureItem {
                name,
                category: *category,
                distance: *distance,
            });
        }
        items.sort_by(by_distance_then_name);
    }

    items
}

/// Build a well-formed result from a loosely-typed record.
///
/// Any `overallScore` or `label` present in `raw` is ignored; both are
/// recomputed from the breakdown.
pub fn normalize_analysis(city: &str, sector: &str, raw: &Value) -> AnalysisResult {
    let breakdown = normalize_breakdown(raw.get("breakdown"));
    let overall_score = overall_score(&breakdown);
    let infrastructure = normalize_infrastructure(raw.get("infrastructure"), city, sector);

    let summary = if infrastructure.is_empty() {
        UNAVAILABLE_SUMMARY.to_string()
    } else {
        raw.get("summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUMMARY)
            .to_string()
    };

    AnalysisResult {
        city: city.to_string(),
        sector: sector.to_string(),
        overall_score,
        label: Label::from_score(overall_score),
        breakdown,
        infrastructure,
        summary,
    }
}

impl AnalysisResult {
    /// Run this result back through the normalizer.
    pub fn renormalized(&self) -> AnalysisResult {
        let raw = serde_json::to_value(self).unwrap_or(Value::Null);
        normalize_analysis(&self.city, &self.sector, &raw)
    }
}
