//! One tiered cache per result kind.

use super::backend::DurableStore;
use super::manager::{CacheConfig, Clock, SystemClock, TieredCache};
use crate::ambiguity::AmbiguityVerdict;
use crate::analysis::AnalysisResult;
use crate::guardrails::ValidationVerdict;
use std::sync::Arc;
use tracing::info;

pub const VALIDATION_BUCKET: &str = "validation";
pub const AMBIGUITY_BUCKET: &str = "ambiguity";
pub const ANALYSIS_BUCKET: &str = "analysis";

pub struct ResultCaches {
    pub validation: Arc<TieredCache<ValidationVerdict>>,
    pub ambiguity: Arc<TieredCache<AmbiguityVerdict>>,
    pub analysis: Arc<TieredCache<AnalysisResult>>,
}

impl ResultCaches {
    pub fn new(config: CacheConfig, store: Arc<dyn DurableStore>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            validation: Arc::new(TieredCache::with_clock(
                VALIDATION_BUCKET,
                config.clone(),
                store.clone(),
                clock.clone(),
            )),
            ambiguity: Arc::new(TieredCache::with_clock(
                AMBIGUITY_BUCKET,
                config.clone(),
                store.clone(),
                clock.clone(),
            )),
            analysis: Arc::new(TieredCache::with_clock(ANALYSIS_BUCKET, config, store, clock)),
        }
    }

    /// Warm every memory tier from the durable store.
    pub async fn load_all(&self) -> usize {
        let validation = self.validation.load_all().await;
        let ambiguity = self.ambiguity.load_all().await;
        let analysis = self.analysis.load_all().await;
        info!(validation, ambiguity, analysis, "warmed result caches");
        validation + ambiguity + analysis
    }

    pub async fn flush(&self) {
        self.validation.flush().await;
        self.ambiguity.flush().await;
        self.analysis.flush().await;
    }
}
