//! 生成适配层：模型候选回退与确定性采样。
//!
//! Generation adapter.
//!
//! Wraps the external text-generation service behind [`GenerationBackend`]
//! and adds two guarantees on top of it:
//!
//! - **Model-candidate fallback**: [`Generator`] walks an ordered list of
//!   model ids and moves on only when a candidate is reported as not found.
//!   Every other failure aborts the call.
//! - **Deterministic sampling**: every request carries
//!   [`SamplingConfig::deterministic`] parameters and a seed derived from the
//!   request key and purpose, so identical inputs produce identical raw output
//!   whenever the service honors seeding.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`GenerationBackend`] | Trait for a concrete generation service |
//! | [`GenerationRequest`] | Prompt, response schema and sampling |
//! | [`Generator`] | Candidate fallback loop plus JSON extraction |
//! | [`prompts`] | Per-purpose prompts and response schemas |

mod fallback;
pub mod prompts;

pub use fallback::Generator;

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL_CANDIDATES: &[&str] =
    &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-flash-latest"];

pub fn default_model_candidates() -> Vec<String> {
    DEFAULT_MODEL_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

/// Sampling parameters sent with every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub candidate_count: u32,
    pub seed: u32,
}

impl SamplingConfig {
    /// Greedy, single-candidate sampling pinned to `seed`.
    pub fn deterministic(seed: u32) -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.0,
            top_k: 1,
            candidate_count: 1,
            seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
    pub sampling: SamplingConfig,
}

/// A text-generation service.
///
/// Implementations must report an unknown model id as
/// [`Error::ModelNotFound`](crate::Error::ModelNotFound) and anything else as
/// a different variant.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, model: &str, request: &GenerationRequest) -> Result<String>;
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_sampling_is_pinned() {
        let s = SamplingConfig::deterministic(42);
        assert_eq!(s.temperature, 0.0);
        assert_eq!(s.top_p, 0.0);
        assert_eq!(s.top_k, 1);
        assert_eq!(s.candidate_count, 1);
        assert_eq!(s.seed, 42);
    }

    #[test]
    fn test_default_candidates_are_ordered() {
        let c = default_model_candidates();
        assert_eq!(c.first().map(String::as_str), Some("gemini-2.0-flash"));
        assert_eq!(c.len(), DEFAULT_MODEL_CANDIDATES.len());
    }
}
