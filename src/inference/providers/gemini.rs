//! Google Gemini provider using the `generateContent` REST endpoint.
//!
//! One user turn in, the first candidate's text parts out. Parts flagged as
//! `thought` are model reasoning and are dropped.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{error_body, http_client};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// generateContent Types
// ============================================================================

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize, Debug)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: String,
    #[serde(default)]
    thought: bool,
}

/// Joins the visible text of the first candidate. No candidates → empty.
fn response_text(response: GenerateContentResponse) -> String {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return String::new();
    };
    debug!("Gemini finish reason: {:?}", candidate.finish_reason);
    candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `api_key` - Google AI Studio API key
    /// * `base_url` - Optional custom base URL (defaults to the public v1beta API)
    /// * `timeout` - Optional whole-request timeout
    pub fn new(api_key: String, base_url: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: http_client(timeout),
        }
    }

    /// `{base}/models/{model}:generateContent`, with the model name escaped
    /// as a single path segment.
    fn generate_url(&self, model: &str) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Config(format!("invalid Gemini base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config(format!("Gemini base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model}:generateContent"));
        Ok(url)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: request.prompt,
                }],
            }],
        };
        let url = self.generate_url(request.model)?;
        info!(
            "Gemini generateContent request: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_body(response).await;
            warn!("Gemini API error: {} - {}", status, message);
            return Err(ProviderError::Api { status, message });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let text = response_text(parsed);
        info!("Gemini response: {} bytes of text", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_single_user_turn() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"contents":[{"role":"user","parts":[{"text":"hello"}]}]}"#);
    }

    #[test]
    fn test_response_text_joins_parts_and_skips_thoughts() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking hard", "thought": true},
                    {"text": "Surat "},
                    {"text": "Perjanjian"}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response_text(parsed), "Surat Perjanjian");
    }

    #[test]
    fn test_response_text_without_candidates_is_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(response_text(parsed), "");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = GeminiProvider::new("k".into(), Some("http://localhost:9/".into()), None);
        assert_eq!(provider.base_url, "http://localhost:9");
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_generate_url_keeps_base_path() {
        let provider = GeminiProvider::new("k".into(), None, None);
        let url = provider.generate_url("gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_url_escapes_model_name() {
        let provider = GeminiProvider::new("k".into(), Some("http://localhost:9".into()), None);
        let url = provider.generate_url("tuned/flash?alt=sse").unwrap();
        assert_eq!(url.path(), "/models/tuned%2Fflash%3Falt=sse:generateContent");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_generate_url_rejects_invalid_base() {
        let provider = GeminiProvider::new("k".into(), Some("not a url".into()), None);
        assert!(matches!(provider.generate_url("m"), Err(ProviderError::Config(_))));
    }
}
