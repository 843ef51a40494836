use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::TitleMappingError;
use super::mapper::TitleMapper;
use super::vocabulary::TitleVocabulary;
use crate::profile::TitleResolution;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions backed title mapper.
pub struct OpenAiTitleMapper {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiTitleMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTitleMapper")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Removes a surrounding Markdown code fence (with optional language tag).
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => return "",
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

impl OpenAiTitleMapper {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TitleMappingError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TitleMappingError::InvalidConfig {
                reason: "API key is empty".to_string(),
            });
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_prompt(raw_titles: &[String], vocabulary: &TitleVocabulary) -> String {
        let titles_json = serde_json::to_string(raw_titles).unwrap_or_else(|_| "[]".to_string());
        format!(
            "You are mapping job titles to a canonical list.\n\
             For each raw title below, return the single closest standardized title from the provided list.\n\
             If there is no reasonable match, return \"NONE\".\n\
             Respond as a JSON object mapping each raw title (exact string, as key) to a standardized title or \"NONE\".\n\n\
             Raw titles: {titles_json}\n\n\
             Standardized titles list:\n{}\n",
            vocabulary.titles().join("\n")
        )
    }

    pub fn request_body(&self, raw_titles: &[String], vocabulary: &TitleVocabulary) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "user", "content": Self::build_prompt(raw_titles, vocabulary) }
            ],
        })
    }

    /// Parses the assistant message into resolutions for `raw_titles`.
    ///
    /// Answers outside the vocabulary and titles missing from the answer map
    /// to NONE; keys not in `raw_titles` are ignored.
    pub fn parse_answer(
        content: &str,
        raw_titles: &[String],
        vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError> {
        let answer: HashMap<String, serde_json::Value> = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| TitleMappingError::InvalidResponse {
                reason: e.to_string(),
            })?;

        Ok(raw_titles
            .iter()
            .map(|raw| {
                let resolution = answer
                    .get(raw)
                    .or_else(|| answer.get(raw.trim()))
                    .and_then(serde_json::Value::as_str)
                    .and_then(|mapped| vocabulary.canonical(mapped))
                    .map(|canonical| TitleResolution::Canonical(canonical.to_string()))
                    .unwrap_or(TitleResolution::NoMatch);
                (raw.clone(), resolution)
            })
            .collect())
    }

    pub fn parse_response(
        body: &str,
        raw_titles: &[String],
        vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError> {
        let parsed: ChatResponse =
            serde_json::from_str(body).map_err(|e| TitleMappingError::InvalidResponse {
                reason: e.to_string(),
            })?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TitleMappingError::InvalidResponse {
                reason: "response has no message content".to_string(),
            })?;
        Self::parse_answer(&content, raw_titles, vocabulary)
    }
}

#[async_trait]
impl TitleMapper for OpenAiTitleMapper {
    fn mode(&self) -> &'static str {
        "openai"
    }

    async fn map_batch(
        &self,
        raw_titles: &[String],
        vocabulary: &TitleVocabulary,
    ) -> Result<HashMap<String, TitleResolution>, TitleMappingError> {
        if raw_titles.is_empty() {
            return Ok(HashMap::new());
        }
        debug!(count = raw_titles.len(), model = %self.model, "requesting title mapping");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(raw_titles, vocabulary))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(TitleMappingError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }
        Self::parse_response(&body, raw_titles, vocabulary)
    }
}
