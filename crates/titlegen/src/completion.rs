use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use sellery_core::config::LlmConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service call failed: {0}")]
    Upstream(String),
    #[error("completion service returned no usable text")]
    NoContent,
}

/// The outbound seam to the text-completion service: one prompt in, one
/// raw completion string out. Retry and backoff policy belongs to callers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// The service answers in one of two shapes: the candidate list of the
/// generateContent API, or a flattened `{ "text": ... }` body some proxy
/// deployments return. Each variant knows how to yield its text; call
/// sites never inspect the shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CompletionBody {
    Candidates { candidates: Vec<Candidate> },
    Inline { text: String },
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl CompletionBody {
    pub fn extract_text(&self) -> Option<String> {
        let text = match self {
            Self::Candidates { candidates } => candidates
                .first()?
                .content
                .as_ref()?
                .parts
                .first()?
                .text
                .as_deref()?
                .trim()
                .to_string(),
            Self::Inline { text } => text.trim().to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Client for the Gemini generateContent endpoint with a fixed model
/// identifier taken from configuration.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CompletionError::Upstream("llm.api_key is not configured".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| CompletionError::Upstream(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![RequestContent { role: "user", parts: vec![RequestPart { text: prompt }] }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|error| CompletionError::Upstream(error.to_string()))?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|error| CompletionError::Upstream(error.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Upstream(format!(
                "completion endpoint returned {status}: {raw_body}"
            )));
        }

        let body: CompletionBody = serde_json::from_str(&raw_body)
            .map_err(|error| CompletionError::Upstream(format!("unexpected response shape: {error}")))?;

        match body.extract_text() {
            Some(text) => Ok(text),
            None => {
                debug!(raw_response = %raw_body, "completion response carried no text");
                Err(CompletionError::NoContent)
            }
        }
    }
}
