use async_trait::async_trait;

use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

/// Stands in for a hosted provider whose credential is missing.
///
/// Every call fails with `ProviderError::Config`, so the dashboard keeps
/// working and generated text falls back to its fixed strings.
pub struct UnconfiguredProvider {
    provider: String,
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        Err(ProviderError::Config(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_fails_with_config_error() {
        let provider = UnconfiguredProvider::new("gemini", "GEMINI_API_KEY is not set");
        let result = tokio_test::block_on(provider.complete(CompletionRequest {
            model: "gemini-2.5-flash",
            prompt: "hello",
        }));
        assert!(matches!(result, Err(ProviderError::Config(msg)) if msg.contains("GEMINI_API_KEY")));
        assert_eq!(provider.name(), "gemini");
    }
}
