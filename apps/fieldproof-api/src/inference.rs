//! Vision-model inference collaborator
//!
//! The engine consumes structured findings payloads; producing them from
//! photos is this collaborator's job. The call is strictly
//! request/response, and retry/backoff policy belongs to the service
//! operator, not here. Parse failures are surfaced distinctly from
//! transport failures so the boundary can answer 502 vs 500.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use shared_types::Violation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("response was not valid JSON: {0}")]
    Parse(String),
}

/// Inference request for a fresh analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCall {
    pub images: Vec<String>,
    pub work_type: String,
    pub user_description: Option<String>,
    pub jurisdiction: String,
}

/// Inference request for a recheck of remediated work
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecheckCall {
    pub original_violations: Vec<Violation>,
    pub original_image: String,
    pub fixed_image: String,
    pub user_description: Option<String>,
    pub jurisdiction: String,
}

#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn analyze(&self, call: AnalyzeCall) -> Result<Value, InferenceError>;
    async fn recheck(&self, call: RecheckCall) -> Result<Value, InferenceError>;
}

/// HTTP client posting JSON to the configured inference endpoint
pub struct HttpInferenceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInferenceClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, InferenceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Transport(format!(
                "{} returned {}",
                url, status
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn analyze(&self, call: AnalyzeCall) -> Result<Value, InferenceError> {
        self.post_json("/analyze", &call).await
    }

    async fn recheck(&self, call: RecheckCall) -> Result<Value, InferenceError> {
        self.post_json("/recheck", &call).await
    }
}

/// Scripted client for tests: returns canned values in order
#[cfg(test)]
pub struct MockInference {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<Value, InferenceError>>>,
}

#[cfg(test)]
impl MockInference {
    pub fn with_responses(responses: Vec<Result<Value, InferenceError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
        }
    }

    fn next(&self) -> Result<Value, InferenceError> {
        self.responses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::Transport("mock exhausted".to_string())))
    }
}

#[cfg(test)]
#[async_trait]
impl InferenceClient for MockInference {
    async fn analyze(&self, _call: AnalyzeCall) -> Result<Value, InferenceError> {
        self.next()
    }

    async fn recheck(&self, _call: RecheckCall) -> Result<Value, InferenceError> {
        self.next()
    }
}
