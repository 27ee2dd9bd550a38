//! OpenRouter provider implementation using the Responses API.
//!
//! Non-streaming: one `POST /responses` with a single user message, then
//! every `output_text` part of every `message` output item, concatenated.
//! Reasoning output items are skipped.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{error_body, http_client};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// OpenRouter Responses API Types
// ============================================================================

/// Role in an input message (OpenAI terminology)
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
}

#[derive(Serialize, Debug)]
#[serde(tag = "type", rename = "message")]
struct InputMessage<'a> {
    role: Role,
    content: &'a str,
}

/// The request body for the Responses API
#[derive(Serialize, Debug)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize, Debug)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize, Debug)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

fn output_text(response: ResponsesResponse) -> String {
    response
        .output
        .into_iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content)
        .filter(|part| part.content_type == "output_text")
        .map(|part| part.text)
        .collect()
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider using Responses API
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    /// * `timeout` - Optional whole-request timeout
    pub fn new(api_key: String, base_url: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: http_client(timeout),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ResponsesRequest {
            model: request.model,
            input: vec![InputMessage {
                role: Role::User,
                content: request.prompt,
            }],
        };
        info!(
            "OpenRouter Responses API request: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("OpenRouter response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = error_body(response).await;
            warn!("OpenRouter API error: {} - {}", status, message);
            return Err(ProviderError::Api { status, message });
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let text = output_text(parsed);
        info!("OpenRouter response: {} bytes of text", text.len());
        Ok(text)
    }
}
