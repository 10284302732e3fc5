use super::Orchestrator;
use crate::cache::{CacheConfig, Clock, DurableStore, FileStore, MemoryStore, ResultCaches, SystemClock};
use crate::config::AppConfig;
use crate::drivers::GeminiBackend;
use crate::generation::{default_model_candidates, GenerationBackend, Generator};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for wiring an [`Orchestrator`] together.
///
/// Without a backend the orchestrator runs offline: validation fails open,
/// ambiguity is skipped and every analysis is the fallback estimate.
pub struct OrchestratorBuilder {
    backend: Option<Arc<dyn GenerationBackend>>,
    model_candidates: Vec<String>,
    store: Option<Arc<dyn DurableStore>>,
    cache_config: CacheConfig,
    clock: Arc<dyn Clock>,
    warm_caches: bool,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            model_candidates: default_model_candidates(),
            store: None,
            cache_config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
            warm_caches: true,
        }
    }

    /// Derive everything from an [`AppConfig`]. A Gemini backend is created
    /// only when an API key is present; the durable tier is a [`FileStore`]
    /// when `cache_dir` is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::new()
            .model_candidates(config.model_candidates.clone())
            .cache_config(config.cache_config());

        if let Some(dir) = &config.cache_dir {
            builder = builder.durable_store(Arc::new(FileStore::new(dir)));
        }
        if let Some(key) = &config.api_key {
            let backend = GeminiBackend::new(
                &config.base_url,
                key.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )?;
            builder = builder.backend(Arc::new(backend));
        }
        Ok(builder)
    }

    /// Set the generation backend.
    pub fn backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Ordered model ids tried by the generator.
    pub fn model_candidates(mut self, candidates: Vec<String>) -> Self {
        self.model_candidates = candidates;
        self
    }

    /// Durable tier shared by all cache buckets. Defaults to a [`MemoryStore`].
    pub fn durable_store(mut self, store: Arc<dyn DurableStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Override the cache clock (primarily for TTL tests).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load persisted snapshots into memory on build. Enabled by default.
    pub fn warm_caches(mut self, enable: bool) -> Self {
        self.warm_caches = enable;
        self
    }

    pub async fn build(self) -> Result<Orchestrator> {
        let generator = match self.backend {
            Some(backend) => Some(Arc::new(Generator::new(backend, self.model_candidates)?)),
            None => None,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn DurableStore>);
        let caches = ResultCaches::with_clock(self.cache_config, store, self.clock);
        if self.warm_caches {
            caches.load_all().await;
        }

        info!(
            generation = generator.as_ref().map(|g| g.backend_name()).unwrap_or("none"),
            cache_backend = caches.analysis.backend_name(),
            "orchestrator ready"
        );
        Ok(Orchestrator::new(generator, caches))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
