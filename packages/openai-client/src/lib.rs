//! Minimal OpenAI REST API client
//!
//! A small client for the chat completions endpoint with no domain-specific
//! logic. Supports JSON mode and multimodal (image) user messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o-mini")
//!         .message(Message::system("Answer in JSON"))
//!         .message(Message::user("Describe a portfolio piece"))
//!         .json_mode(),
//! ).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat completions client holding the API key and base URL.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(OpenAIError::Config("OPENAI_API_KEY is missing or empty".into())),
        }
    }

    /// Point at a compatible endpoint; a trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs one completion and returns the trimmed text of the first choice.
    ///
    /// A choice with no text is an [`OpenAIError::EmptyResponse`].
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let started = std::time::Instant::now();
        let raw = self.post_completion(&request).await?;

        let first = raw
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        if first.is_empty() {
            return Err(OpenAIError::EmptyResponse("no content in first choice".into()));
        }

        debug!(
            model = %request.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion finished"
        );
        Ok(ChatResponse {
            content: first,
            usage: raw.usage,
        })
    }

    async fn post_completion(&self, request: &ChatRequest) -> Result<types::ChatResponseRaw> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model = %request.model, "chat completion request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<types::ChatResponseRaw>()
                .await
                .map_err(|e| OpenAIError::Parse(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<types::ApiErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        warn!(status = status.as_u16(), error = %message, "chat completion rejected");
        Err(OpenAIError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_base_url_trims_slash() {
        let client = OpenAIClient::new("sk-test").with_base_url("http://localhost:11434/v1/");
        assert_eq!(client.base_url(), "http://localhost:11434/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = OpenAIClient::new("sk-secret");
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_chat_completion_returns_first_choice() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"content":"  {\"title\":\"A\"}  "}}],
                    "usage":{"prompt_tokens":3,"completion_tokens":2,"total_tokens":5}}"#,
            )
            .create_async()
            .await;

        let client = OpenAIClient::new("sk-test").with_base_url(server.url());
        let response = client
            .chat_completion(ChatRequest::new("gpt-4o-mini").message(Message::user("hi")))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, r#"{"title":"A"}"#);
        assert_eq!(response.usage.unwrap().total_tokens, 5);
    }

    #[tokio::test]
    async fn test_chat_completion_surfaces_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new("sk-test").with_base_url(server.url());
        let err = client
            .chat_completion(ChatRequest::new("gpt-4o-mini").message(Message::user("hi")))
            .await
            .unwrap_err();

        match &err {
            OpenAIError::Api { status, message } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_chat_completion_rejects_empty_content() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new("sk-test").with_base_url(server.url());
        let err = client
            .chat_completion(ChatRequest::new("gpt-4o-mini").message(Message::user("hi")))
            .await
            .unwrap_err();

        assert!(matches!(err, OpenAIError::EmptyResponse(_)));
    }
}
