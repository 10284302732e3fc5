//! Deterministic stand-in analysis for when generation fails.

use super::normalize::{normalize_analysis, round_to};
use super::types::AnalysisResult;
use crate::cache::{fnv1a_32, Purpose, RequestKey};
use serde_json::json;

const FALLBACK_SCORE_FLOOR: f64 = 40.0;
const FALLBACK_SCORE_SPAN_TENTHS: u32 = 400;

fn fallback_score(seed: u32, dimension: &str) -> f64 {
    let mixed = fnv1a_32(format!("{}::{}", seed, dimension).as_bytes());
    round_to(
        FALLBACK_SCORE_FLOOR + f64::from(mixed % FALLBACK_SCORE_SPAN_TENTHS) / 10.0,
        1,
    )
}

/// Scores in [40, 80) drawn from the `fallback` seed of `key`; the
/// infrastructure comes entirely from the normalizer's backfill templates.
/// The same key always yields the same result.
pub fn fallback_analysis(key: &RequestKey, city: &str, sector: &str) -> AnalysisResult {
    let seed = key.seed(Purpose::Fallback);
    let raw = json!({
        "breakdown": {
            "connectivity": fallback_score(seed, "connectivity"),
            "healthcare": fallback_score(seed, "healthcare"),
            "education": fallback_score(seed, "education"),
            "retail": fallback_score(seed, "retail"),
            "employment": fallback_score(seed, "employment"),
        },
        "infrastructure": [],
    });
    normalize_analysis(city, sector, &raw)
}
