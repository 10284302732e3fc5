//! Scripted generation backend: canned replies per stage, with call recording

#![allow(dead_code)]

use async_trait::async_trait;
use market_potential::cache::{CacheConfig, Clock, DurableStore, MemoryStore};
use market_potential::generation::{GenerationBackend, GenerationRequest};
use market_potential::{Error, Orchestrator, OrchestratorBuilder};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validation,
    Ambiguity,
    Analysis,
}

impl Stage {
    fn of(request: &GenerationRequest) -> Self {
        let properties = &request.response_schema["properties"];
        if properties.get("isValid").is_some() {
            Stage::Validation
        } else if properties.get("isAmbiguous").is_some() {
            Stage::Ambiguity
        } else {
            Stage::Analysis
        }
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    ServerError,
}

#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<HashMap<Stage, Reply>>,
    missing_models: HashSet<String>,
    calls: Mutex<Vec<(Stage, String, u32)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models that answer with "model not found".
    pub fn with_missing_models(mut self, models: &[&str]) -> Self {
        self.missing_models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn reply(self, stage: Stage, reply: Reply) -> Self {
        self.set_reply(stage, reply);
        self
    }

    pub fn set_reply(&self, stage: Stage, reply: Reply) {
        self.replies.lock().unwrap().insert(stage, reply);
    }

    pub fn calls(&self, stage: Stage) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _, _)| *s == stage)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Models that were asked, in call order.
    pub fn models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m, _)| m.clone())
            .collect()
    }

    pub fn seeds(&self, stage: Stage) -> Vec<u32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _, _)| *s == stage)
            .map(|(_, _, seed)| *seed)
            .collect()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> market_potential::Result<String> {
        // Suspend like a real network call so concurrent fetches interleave.
        tokio::task::yield_now().await;

        let stage = Stage::of(request);
        self.calls
            .lock()
            .unwrap()
            .push((stage, model.to_string(), request.sampling.seed));

        if self.missing_models.contains(model) {
            return Err(Error::ModelNotFound {
                model: model.to_string(),
                message: "not found".into(),
            });
        }
        let reply = self.replies.lock().unwrap().get(&stage).cloned();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::ServerError) | None => Err(Error::Remote {
                status: 500,
                class: "server_error".into(),
                message: "scripted failure".into(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn valid() -> Reply {
    Reply::Text(r#"{"isValid": true, "reason": "known locality"}"#.into())
}

pub fn not_ambiguous() -> Reply {
    Reply::Text(r#"{"isAmbiguous": false, "suggestedCities": []}"#.into())
}

pub fn analysis() -> Reply {
    Reply::Text(
        r#"```json
{
  "breakdown": {"connectivity": 90, "healthcare": 80, "education": 85, "retail": 75, "employment": 70},
  "infrastructure": [
    {"name": "Balewadi High Street", "category": "mall", "distance": 2.1},
    {"name": "Jupiter Hospital", "category": "hospital", "distance": "1.4 km"},
    {"name": "Vibgyor High", "category": "school", "distance": 0.9},
    {"name": "Baner Hill", "category": "park", "distance": 1.1},
    {"name": "Pune Metro Line 3", "category": "metro", "distance": 3.0}
  ],
  "summary": "Established western suburb with steady demand."
}
```"#
            .into(),
    )
}

/// A backend that answers every stage successfully.
pub fn happy_backend() -> ScriptedBackend {
    ScriptedBackend::new()
        .reply(Stage::Validation, valid())
        .reply(Stage::Ambiguity, not_ambiguous())
        .reply(Stage::Analysis, analysis())
}

pub async fn orchestrator_with(
    backend: Arc<ScriptedBackend>,
    store: Arc<dyn DurableStore>,
    clock: Option<Arc<dyn Clock>>,
) -> Orchestrator {
    let mut builder = OrchestratorBuilder::new()
        .backend(backend)
        .model_candidates(vec!["primary".into(), "secondary".into()])
        .durable_store(store)
        .cache_config(CacheConfig::new());
    if let Some(clock) = clock {
        builder = builder.clock(clock);
    }
    builder.build().await.unwrap()
}

pub async fn orchestrator(backend: Arc<ScriptedBackend>) -> Orchestrator {
    orchestrator_with(backend, Arc::new(MemoryStore::new()), None).await
}
