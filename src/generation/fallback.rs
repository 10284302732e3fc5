//! Model-candidate fallback.

use super::{GenerationBackend, GenerationRequest, SamplingConfig};
use crate::cache::{Purpose, RequestKey};
use crate::structured::StructuredOutput;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Calls a [`GenerationBackend`] with an ordered list of model candidates.
pub struct Generator {
    backend: Arc<dyn GenerationBackend>,
    candidates: Vec<String>,
}

impl Generator {
    pub fn new(backend: Arc<dyn GenerationBackend>, candidates: Vec<String>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one model candidate is required",
                ErrorContext::new()
                    .with_field_path("model_candidates")
                    .with_source("generator"),
            ));
        }
        Ok(Self {
            backend,
            candidates,
        })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Try each candidate in order. Only a model-not-found failure moves on
    /// to the next one; the last such failure is returned when all are
    /// exhausted.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let mut last_error = None;
        for model in &self.candidates {
            let start = Instant::now();
            match self.backend.generate(model, request).await {
                Ok(text) => {
                    info!(
                        model = model.as_str(),
                        seed = request.sampling.seed,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "generation succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_model_not_found() => {
                    warn!(model = model.as_str(), error = %e, "model candidate not found, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error.unwrap_or_else(|| Error::runtime("no model candidates configured")))
    }

    /// Seeded call for `purpose` whose text must contain a JSON document.
    pub async fn generate_json(
        &self,
        purpose: Purpose,
        key: &RequestKey,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let request = GenerationRequest {
            prompt,
            response_schema,
            sampling: SamplingConfig::deterministic(key.seed(purpose)),
        };
        debug!(
            purpose = purpose.as_str(),
            key = key.as_str(),
            seed = request.sampling.seed,
            "structured generation"
        );
        let text = self.generate(&request).await?;
        StructuredOutput::from_response(text)
            .into_parsed()
            .ok_or_else(|| Error::parse(purpose.as_str(), "response did not contain JSON"))
    }
}
