//! 输入校验：在调用外部服务之前拒绝明显无效的输入。
//!
//! # Input Guardrails
//!
//! Two-stage plausibility check for a (city, sector) pair.
//!
//! | Stage | Runs | On failure |
//! |-------|------|------------|
//! | Local rules ([`filters`]) | always, no external call | `isValid: false` |
//! | Remote plausibility check | when a [`Generator`] is configured | fail open |
//!
//! A local rejection is final whatever the state of the generation service.
//! When the remote check cannot run (no service configured, or the call
//! fails) the verdict is `{isValid: true, reason: "validation unavailable"}`
//! and is not cached, so a later call can still get a real answer.

pub mod filters;
mod result;

pub use filters::{default_rules, InputRule};
pub use result::{ValidationVerdict, UNAVAILABLE_REASON};

use crate::cache::{Purpose, RequestKey, TieredCache};
use crate::generation::{prompts, Generator};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const REMOTE_REJECTION_REASON: &str = "Invalid input: not a recognizable place name";

/// Run the local rules over both fields. Returns the rejection reason, if any.
pub fn check_local(city: &str, sector: &str) -> Option<String> {
    let rules = default_rules();
    for (field, value) in [("city", city.trim()), ("sector", sector.trim())] {
        for rule in &rules {
            if let Some(problem) = rule.check(value) {
                debug!(field, rule = rule.name(), "local input rule rejected value");
                return Some(format!("Invalid input: {} {}", field, problem));
            }
        }
    }
    None
}

pub struct InputValidator {
    generator: Option<Arc<Generator>>,
    cache: Arc<TieredCache<ValidationVerdict>>,
}

impl InputValidator {
    pub fn new(generator: Option<Arc<Generator>>, cache: Arc<TieredCache<ValidationVerdict>>) -> Self {
        Self { generator, cache }
    }

    pub async fn validate(&self, city: &str, sector: &str) -> ValidationVerdict {
        let key = RequestKey::new(city, sector);
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        if let Some(reason) = check_local(city, sector) {
            let verdict = ValidationVerdict::invalid(reason);
            self.cache.set(&key, verdict.clone()).await;
            return verdict;
        }

        let Some(generator) = &self.generator else {
            return ValidationVerdict::unavailable();
        };

        let response = generator
            .generate_json(
                Purpose::Validation,
                &key,
                prompts::validation_prompt(city.trim(), sector.trim()),
                prompts::validation_schema(),
            )
            .await;

        match response.and_then(|value| Self::parse_verdict(&value)) {
            Ok(verdict) => {
                self.cache.set(&key, verdict.clone()).await;
                verdict
            }
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "remote validation failed, failing open");
                ValidationVerdict::unavailable()
            }
        }
    }

    fn parse_verdict(value: &Value) -> crate::Result<ValidationVerdict> {
        let is_valid = value
            .get("isValid")
            .and_then(Value::as_bool)
            .ok_or_else(|| crate::Error::parse(Purpose::Validation.as_str(), "missing isValid"))?;
        let reason = value
            .get("reason")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty());
        Ok(if is_valid {
            ValidationVerdict::valid(reason.unwrap_or("plausible place name"))
        } else {
            ValidationVerdict::invalid(match reason {
                Some(r) if r.starts_with("Invalid input") => r.to_string(),
                Some(r) => format!("Invalid input: {}", r),
                None => REMOTE_REJECTION_REASON.to_string(),
            })
        })
    }
}
