use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI-compatible `/embeddings` client.
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        dimension: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "API key is empty".to_string(),
            });
        }
        crate::constants::DimConfig::new(dimension).validate()?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model: model.into(),
            dimension,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON body for one batch.
    pub fn request_body(&self, texts: &[String]) -> serde_json::Value {
        json!({
            "model": self.model,
            "input": texts,
        })
    }

    /// Parses a response body, restoring input order by `index`.
    pub fn parse_response(&self, body: &str, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut parsed: EmbeddingsResponse =
            serde_json::from_str(body).map_err(|e| EmbeddingError::InvalidResponse {
                reason: e.to_string(),
            })?;

        if parsed.data.len() != expected {
            return Err(EmbeddingError::CountMismatch {
                expected,
                actual: parsed.data.len(),
            });
        }
        parsed.data.sort_by_key(|d| d.index);

        parsed
            .data
            .into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimension {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimension,
                        actual: d.embedding.len(),
                    });
                }
                Ok(d.embedding)
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn mode(&self) -> &'static str {
        "openai"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = texts.len(), model = %self.model, "requesting embeddings");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(texts))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(EmbeddingError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }
        self.parse_response(&body, texts.len())
    }
}
