//! Ambiguity resolution: does this locality name exist in more than one city?

use crate::cache::{Purpose, RequestKey, TieredCache};
use crate::generation::{prompts, Generator};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguityVerdict {
    pub is_ambiguous: bool,
    pub suggested_cities: Vec<String>,
}

impl AmbiguityVerdict {
    pub fn unambiguous() -> Self {
        Self::default()
    }

    /// Suggestions are trimmed, blank entries dropped and duplicates removed
    /// case-insensitively, keeping first-seen order.
    pub fn new(is_ambiguous: bool, suggested_cities: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let suggested_cities = suggested_cities
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
            .collect();
        Self {
            is_ambiguous,
            suggested_cities,
        }
    }

    /// A single suggestion is not actionable ambiguity.
    pub fn needs_clarification(&self) -> bool {
        self.is_ambiguous && self.suggested_cities.len() > 1
    }
}

pub struct AmbiguityResolver {
    generator: Option<Arc<Generator>>,
    cache: Arc<TieredCache<AmbiguityVerdict>>,
}

impl AmbiguityResolver {
    pub fn new(generator: Option<Arc<Generator>>, cache: Arc<TieredCache<AmbiguityVerdict>>) -> Self {
        Self { generator, cache }
    }

    /// Ask whether `sector` is known in several cities.
    ///
    /// Without a configured generator the answer is "not ambiguous". Service
    /// failures are returned to the caller and nothing is cached for them.
    pub async fn resolve(&self, city: &str, sector: &str) -> Result<AmbiguityVerdict> {
        let key = RequestKey::new(city, sector);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }
        let Some(generator) = &self.generator else {
            return Ok(AmbiguityVerdict::unambiguous());
        };

        let value = generator
            .generate_json(
                Purpose::Ambiguity,
                &key,
                prompts::ambiguity_prompt(city.trim(), sector.trim()),
                prompts::ambiguity_schema(),
            )
            .await?;
        let verdict = Self::parse_verdict(&value)?;
        self.cache.set(&key, verdict.clone()).await;
        Ok(verdict)
    }

    fn parse_verdict(value: &Value) -> Result<AmbiguityVerdict> {
        let is_ambiguous = value
            .get("isAmbiguous")
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::parse(Purpose::Ambiguity.as_str(), "missing isAmbiguous"))?;
        let cities = value
            .get("suggestedCities")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(AmbiguityVerdict::new(is_ambiguous, cities))
    }
}
