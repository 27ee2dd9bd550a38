mod gemini;
mod openrouter;
mod unconfigured;

pub use gemini::{DEFAULT_GEMINI_BASE_URL, GeminiProvider};
pub use openrouter::{DEFAULT_OPENROUTER_BASE_URL, OpenRouterProvider};
pub use unconfigured::UnconfiguredProvider;

use std::time::Duration;

use log::warn;

/// Builds the HTTP client shared by the hosted providers.
/// Falls back to reqwest defaults if the builder refuses the timeout.
fn http_client(timeout: Option<Duration>) -> reqwest::Client {
    let Some(timeout) = timeout else {
        return reqwest::Client::new();
    };
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with {timeout:?} timeout: {e}");
            reqwest::Client::new()
        })
}

/// Reads an error body for an `Api` error, tolerating unreadable bodies.
async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string())
}
