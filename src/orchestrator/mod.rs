//! Request orchestration.
//!
//! `submit` registers a request under its deterministic id; the first `fetch`
//! of a pending record runs the pipeline once:
//!
//! 1. Input validation. Rejection ends in `invalid_input`.
//! 2. Ambiguity check. More than one suggested city ends in
//!    `needs_clarification`. A failing check counts as "not ambiguous".
//! 3. Analysis. Ends in `done`. If the service cannot produce an analysis the
//!    record is still `done`, with a deterministic fallback result and an error
//!    string.
//!
//! Terminal records are returned as stored on every later fetch.

mod builder;
mod record;
mod store;

pub use builder::OrchestratorBuilder;
pub use record::{RequestRecord, RequestStatus, Resolution, SubmitResponse};
pub use store::RequestStore;

use crate::ambiguity::AmbiguityResolver;
use crate::analysis::{fallback_analysis, normalize_analysis, AnalysisResult};
use crate::cache::{Purpose, RequestKey, ResultCaches};
use crate::error_code::ApiErrorCode;
use crate::generation::{prompts, Generator};
use crate::guardrails::InputValidator;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub generation_configured: bool,
    pub generation_backend: Option<&'static str>,
    pub model_candidates: Vec<String>,
    pub cache_backend: &'static str,
    pub records: usize,
}

pub struct Orchestrator {
    store: RequestStore,
    caches: ResultCaches,
    validator: InputValidator,
    resolver: AmbiguityResolver,
    generator: Option<Arc<Generator>>,
}

impl Orchestrator {
    pub fn new(generator: Option<Arc<Generator>>, caches: ResultCaches) -> Self {
        Self {
            store: RequestStore::new(),
            validator: InputValidator::new(generator.clone(), caches.validation.clone()),
            resolver: AmbiguityResolver::new(generator.clone(), caches.ambiguity.clone()),
            caches,
            generator,
        }
    }

    /// Register `(city, sector)` and return its id. Repeat submissions of the
    /// same normalized pair return the same id and never add a record.
    pub fn submit(&self, city: &str, sector: &str) -> Result<SubmitResponse> {
        let (city, sector) = (city.trim(), sector.trim());
        for (field, value) in [("city", city), ("sector", sector)] {
            if value.is_empty() {
                return Err(Error::api_with_message(
                    ApiErrorCode::MissingRequiredField,
                    format!("{} is required", field),
                ));
            }
        }

        let key = RequestKey::new(city, sector);
        let record = self.store.get_or_insert(&key, city, sector);
        info!(request_id = %record.id, key = key.as_str(), status = %record.status, "request submitted");
        Ok(SubmitResponse {
            id: record.id,
            status: record.status,
        })
    }

    /// Return the record for `id`, processing it first if still pending.
    pub async fn fetch(&self, id: &str) -> Result<RequestRecord> {
        let record = self
            .store
            .get(id.trim())
            .ok_or_else(|| Error::api(ApiErrorCode::IdNotFound))?;
        if record.status.is_terminal() {
            return Ok(record);
        }

        let start = Instant::now();
        let resolution = self.process(&record).await;
        let stored = self.store.complete(&record.id, resolution).ok_or_else(|| {
            Error::runtime_with_context(
                "record vanished during processing",
                ErrorContext::new()
                    .with_details(record.id.clone())
                    .with_source("orchestrator"),
            )
        })?;
        info!(
            request_id = %stored.id,
            status = %stored.status,
            fallback = stored.error_code() == Some(ApiErrorCode::InternalFallbackUsed),
            duration_ms = start.elapsed().as_millis() as u64,
            "request resolved"
        );
        Ok(stored)
    }

    async fn process(&self, record: &RequestRecord) -> Resolution {
        let (city, sector) = (record.city.as_str(), record.sector.as_str());
        let key = RequestKey::new(city, sector);

        let verdict = self.validator.validate(city, sector).await;
        if !verdict.is_valid {
            return Resolution::Invalid {
                reason: verdict.reason,
            };
        }

        match self.resolver.resolve(city, sector).await {
            Ok(ambiguity) if ambiguity.needs_clarification() => {
                return Resolution::Ambiguous {
                    suggested_cities: ambiguity.suggested_cities,
                };
            }
            Ok(_) => {}
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "ambiguity check failed, treating as not ambiguous");
            }
        }

        match self.analyze(&key, city, sector).await {
            Ok(result) => Resolution::Analyzed {
                result,
                error: None,
            },
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "analysis failed, using fallback estimate");
                Resolution::Analyzed {
                    result: fallback_analysis(&key, city, sector),
                    error: Some(format!("analysis unavailable, fallback estimate used: {}", e)),
                }
            }
        }
    }

    async fn analyze(&self, key: &RequestKey, city: &str, sector: &str) -> Result<AnalysisResult> {
        if let Some(cached) = self.caches.analysis.get(key).await {
            return Ok(cached);
        }
        let generator = self.generator.as_ref().ok_or_else(|| {
            Error::runtime_with_context(
                "generation service not configured",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_source("orchestrator"),
            )
        })?;

        let raw = generator
            .generate_json(
                Purpose::Analysis,
                key,
                prompts::analysis_prompt(city, sector),
                prompts::analysis_schema(),
            )
            .await?;
        let result = normalize_analysis(city, sector, &raw);
        self.caches.analysis.set(key, result.clone()).await;
        Ok(result)
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            generation_configured: self.generator.is_some(),
            generation_backend: self.generator.as_ref().map(|g| g.backend_name()),
            model_candidates: self
                .generator
                .as_ref()
                .map(|g| g.candidates().to_vec())
                .unwrap_or_default(),
            cache_backend: self.caches.analysis.backend_name(),
            records: self.store.len(),
        }
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    pub fn caches(&self) -> &ResultCaches {
        &self.caches
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    /// Write every cache bucket back to the durable tier.
    pub async fn flush(&self) {
        self.caches.flush().await;
    }
}
