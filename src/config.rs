//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional YAML
//! file, then environment variables:
//!
//! - `MP_CACHE_TTL_DAYS` (default 30)
//! - `MP_CACHE_DIR` (unset: process-local durable tier)
//! - `MP_MODEL_CANDIDATES` (comma separated)
//! - `MP_GENERATION_BASE_URL`
//! - `MP_HTTP_TIMEOUT_SECS` (default 30)
//! - `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`

use crate::cache::{CacheConfig, DEFAULT_TTL_DAYS};
use crate::generation::default_model_candidates;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache_ttl_days: u64,
    pub cache_dir: Option<PathBuf>,
    pub model_candidates: Vec<String>,
    pub api_key: Option<String>,
    pub base_url: String,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_ttl_days: DEFAULT_TTL_DAYS,
            cache_dir: None,
            model_candidates: default_model_candidates(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Overlay values from `lookup`. Unparseable numbers keep the current value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(days) = lookup("MP_CACHE_TTL_DAYS").and_then(|s| s.trim().parse::<u64>().ok()) {
            self.cache_ttl_days = days;
        }
        if let Some(dir) = lookup("MP_CACHE_DIR").filter(|s| !s.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(list) = lookup("MP_MODEL_CANDIDATES") {
            let candidates: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !candidates.is_empty() {
                self.model_candidates = candidates;
            }
        }
        if let Some(url) = lookup("MP_GENERATION_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("MP_HTTP_TIMEOUT_SECS").and_then(|s| s.trim().parse::<u64>().ok()) {
            self.http_timeout_secs = secs;
        }
        if let Some(key) = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|s| !s.trim().is_empty())
        {
            self.api_key = Some(key.trim().to_string());
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_days == 0 {
            return Err(Error::configuration_with_context(
                "cache TTL must be at least one day",
                ErrorContext::new()
                    .with_field_path("cache_ttl_days")
                    .with_source("config_loader"),
            ));
        }
        if self.model_candidates.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one model candidate is required",
                ErrorContext::new()
                    .with_field_path("model_candidates")
                    .with_source("config_loader"),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone())
                    .with_source("config_loader"),
            ));
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_ttl_days(self.cache_ttl_days)
    }
}
