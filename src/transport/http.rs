use crate::{Error, ErrorContext, Result};
use std::env;
use std::time::Duration;
use reqwest::Proxy;

/// Status and body of a completed HTTP exchange, success or not.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid base URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string())
                    .with_source("http_transport"),
            )
        })?;

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(
                env::var("MP_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("MP_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// POST a JSON body. Non-2xx statuses are returned, not raised; only
    /// transport-level failures are errors.
    pub async fn post_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpReply> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .query(query)
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}
