use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::debug;
use url::Url;

use crate::error::{Result, SearchError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of query embeddings
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddingProvider {
  fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Connection settings for an OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
  /// Base URL of the API (e.g., "https://api.openai.com/v1")
  pub base_url: String,
  /// Embedding model identifier
  pub model: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl ProviderConfig {
  pub fn embeddings_url(&self) -> String {
    format!("{}/embeddings", self.base_url.trim_end_matches('/'))
  }

  pub fn validate(&self) -> Result<()> {
    Url::parse(&self.base_url).map_err(|e| SearchError::InvalidBaseUrl {
      url: self.base_url.clone(),
      message: e.to_string(),
    })?;
    Ok(())
  }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
  embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
  error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
  message: String,
}

/// Embedding provider backed by an OpenAI-compatible HTTP API.
///
/// Calls block the current thread; the client drives its own single-threaded runtime.
pub struct OpenAiProvider {
  client: Client,
  runtime: Runtime,
  config: ProviderConfig,
  api_key: String,
}

impl OpenAiProvider {
  pub fn new(api_key: impl Into<String>, config: ProviderConfig) -> Result<Self> {
    let api_key = api_key.into();
    if api_key.trim().is_empty() {
      return Err(SearchError::MissingCredential);
    }
    config.validate()?;

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| SearchError::Provider { message: format!("failed to build HTTP client: {e}") })?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    Ok(Self { client, runtime, config, api_key: api_key.trim().to_string() })
  }

  pub fn config(&self) -> &ProviderConfig {
    &self.config
  }

  async fn request(&self, text: &str) -> Result<Vec<f32>> {
    // Query text is sent as a single line
    let input = text.replace('\n', " ");
    let payload = EmbeddingRequest { model: &self.config.model, input: &input };

    let url = self.config.embeddings_url();
    debug!(url = %url, model = %self.config.model, "requesting query embedding");

    let response = self
      .client
      .post(&url)
      .bearer_auth(&self.api_key)
      .json(&payload)
      .send()
      .await
      .map_err(|e| SearchError::Provider { message: e.to_string() })?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(SearchError::ProviderStatus {
        status: status.as_u16(),
        message: error_message(&body),
      });
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| SearchError::Provider { message: format!("invalid response: {e}") })?;

    parsed
      .data
      .into_iter()
      .next()
      .map(|datum| datum.embedding)
      .filter(|embedding| !embedding.is_empty())
      .ok_or_else(|| SearchError::Provider { message: "response contained no embedding".to_string() })
  }
}

impl EmbeddingProvider for OpenAiProvider {
  fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self.runtime.block_on(self.request(text))
  }
}

fn error_message(body: &str) -> String {
  match serde_json::from_str::<ErrorResponse>(body) {
    Ok(parsed) => parsed.error.message,
    Err(_) if body.trim().is_empty() => "empty response body".to_string(),
    Err(_) => body.trim().to_string(),
  }
}

/// Provider that answers every request with the same vector
#[derive(Debug, Clone)]
pub struct StaticEmbeddingProvider {
  embedding: Vec<f32>,
}

impl StaticEmbeddingProvider {
  pub fn new(embedding: Vec<f32>) -> Self {
    Self { embedding }
  }
}

impl EmbeddingProvider for StaticEmbeddingProvider {
  fn embed(&self, _text: &str) -> Result<Vec<f32>> {
    Ok(self.embedding.clone())
  }
}
