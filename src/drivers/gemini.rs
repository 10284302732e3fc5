//! Gemini generateContent 驱动：确定性采样与结构化 JSON 输出
//!
//! Google Gemini `generateContent` driver.
//!
//! - Endpoint: `POST {base}/v1beta/models/{model}:generateContent?key=...`.
//! - A single user turn in `contents`; sampling and the response schema go in
//!   `generationConfig` (`temperature`, `topP`, `topK`, `candidateCount`,
//!   `seed`, `responseMimeType`, `responseSchema`).
//! - Response text: `candidates[0].content.parts[*].text`.
//! - 404 / `NOT_FOUND`, or a 400 whose message says the model is not found or
//!   unsupported, is reported as [`Error::ModelNotFound`].

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use super::error_class_for_status;
use crate::generation::{GenerationBackend, GenerationRequest};
use crate::transport::{HttpReply, HttpTransport};
use crate::{Error, Result};

pub struct GeminiBackend {
    transport: HttpTransport,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(base_url, timeout)?,
            api_key: api_key.into(),
        })
    }

    fn endpoint(model: &str) -> String {
        let model = model.trim().trim_start_matches("models/");
        format!("/v1beta/models/{}:generateContent", model)
    }

    pub(crate) fn build_body(request: &GenerationRequest) -> Value {
        let s = &request.sampling;
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "temperature": s.temperature,
                "topP": s.top_p,
                "topK": s.top_k,
                "candidateCount": s.candidate_count,
                "seed": s.seed,
                "responseMimeType": "application/json",
                "responseSchema": request.response_schema,
            },
        })
    }

    pub(crate) fn extract_text(body: &Value) -> Option<String> {
        let parts = body.pointer("/candidates/0/content/parts")?.as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }

    fn is_model_routing_error(status: u16, api_status: Option<&str>, message: &str) -> bool {
        if status == 404 || api_status == Some("NOT_FOUND") {
            return true;
        }
        if status != 400 {
            return false;
        }
        // Heuristic for 400s that name the model rather than the request.
        let m = message.to_lowercase();
        m.contains("model")
            && (m.contains("not found")
                || m.contains("not supported")
                || m.contains("is not available")
                || m.contains("decommission"))
    }

    fn classify_failure(model: &str, reply: &HttpReply) -> Error {
        let json: Option<Value> = serde_json::from_str(&reply.body).ok();
        let error = json.as_ref().and_then(|j| j.get("error"));
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| reply.body.clone());
        let api_status = error.and_then(|e| e.get("status")).and_then(Value::as_str);

        if Self::is_model_routing_error(reply.status, api_status, &message) {
            return Error::ModelNotFound {
                model: model.to_string(),
                message,
            };
        }
        Error::Remote {
            status: reply.status,
            class: error_class_for_status(reply.status).to_string(),
            message,
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, model: &str, request: &GenerationRequest) -> Result<String> {
        let start = std::time::Instant::now();
        let reply = self
            .transport
            .post_json(
                &Self::endpoint(model),
                &[("key", self.api_key.as_str())],
                &Self::build_body(request),
            )
            .await?;

        if !reply.is_success() {
            let err = Self::classify_failure(model, &reply);
            info!(
                http_status = reply.status,
                model,
                duration_ms = start.elapsed().as_millis() as u64,
                "gemini request failed"
            );
            return Err(err);
        }

        let body: Value = serde_json::from_str(&reply.body)?;
        Self::extract_text(&body).ok_or_else(|| {
            let reason = body
                .pointer("/promptFeedback/blockReason")
                .or_else(|| body.pointer("/candidates/0/finishReason"))
                .and_then(Value::as_str)
                .unwrap_or("empty response");
            Error::parse("generation", format!("no candidate text ({})", reason))
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
