//! 分析结果规范化：裁剪、重算、排序与补齐。
//!
//! Analysis normalization.
//!
//! The generation service returns a loosely-typed record that may omit
//! fields, carry out-of-range numbers or list stock filler landmarks.
//! [`normalize_analysis`] turns it into a bounded [`AnalysisResult`]:
//!
//! 1. Sub-scores clamped to [0, 100] and rounded to one decimal.
//! 2. `overallScore` recomputed from the weighted breakdown.
//! 3. `label` derived from `overallScore` via fixed thresholds.
//! 4. Infrastructure cleaned, sorted by distance, capped at eight.
//! 5. Short lists backfilled with named placeholders up to five.
//! 6. Summary forced to a fixed sentence when no infrastructure remains.
//!
//! [`fallback_analysis`] produces the deterministic result used when the
//! service cannot be reached at all.

mod fallback;
mod normalize;
mod types;

pub use fallback::fallback_analysis;
pub use normalize::{
    normalize_analysis, normalize_breakdown, normalize_infrastructure, overall_score, round_to,
    CONNECTIVITY_WEIGHT, DEFAULT_SUMMARY, EDUCATION_WEIGHT, EMPLOYMENT_WEIGHT, HEALTHCARE_WEIGHT,
    MAX_DISTANCE_KM, MAX_INFRASTRUCTURE, MIN_INFRASTRUCTURE, RETAIL_WEIGHT, UNAVAILABLE_SUMMARY,
};
pub use types::{AnalysisResult, Breakdown, Category, InfrastructureItem, Label};
