pub mod provider;
pub mod providers;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::{GeminiProvider, OpenRouterProvider, UnconfiguredProvider};
