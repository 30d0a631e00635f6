//! OpenAI-backed language model.
//!
//! # Example
//!
//! ```rust,ignore
//! use portflow::ai::OpenAIModel;
//!
//! let model = OpenAIModel::new("sk-...")
//!     .with_model("gpt-4o-mini")
//!     .with_vision_model("gpt-4o");
//! ```

use async_trait::async_trait;
use openai_client::{strip_code_blocks, ChatRequest, Message, OpenAIClient, OpenAIError};
use std::time::Duration;

use crate::error::{AnalysisError, Result};
use crate::traits::{LanguageModel, ModelRequest};
use crate::types::config::DEFAULT_MODEL;
use crate::types::PipelineConfig;

/// Chat model plus an optional vision model.
#[derive(Debug, Clone)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model: String,
    vision_model: Option<String>,
}

impl OpenAIModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            vision_model: None,
        }
    }

    /// Model from pipeline configuration. `None` without a credential.
    pub fn from_config(config: &PipelineConfig) -> Option<Self> {
        let key = config.model_credential.as_ref()?;
        let model = Self::new(key.expose())
            .with_model(config.model.clone())
            .with_timeout(config.timeouts.model);
        Some(match config.vision_model.clone() {
            Some(vision) => model.with_vision_model(vision),
            None => model,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Enable image prompts with this model.
    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = Some(model.into());
        self
    }

    /// Set a custom base URL (proxies, compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    /// Bound every request. Keeps the default client if it cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match self.client.clone().with_timeout(timeout) {
            Ok(client) => self.client = client,
            Err(e) => tracing::warn!(error = %e, "Keeping OpenAI client without timeout"),
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Rate limits and 5xx count as the model being unavailable.
fn map_error(error: OpenAIError) -> AnalysisError {
    if error.is_transient() {
        return AnalysisError::RemoteServiceUnavailable(error.to_string());
    }
    match error {
        OpenAIError::Network(message) => AnalysisError::RemoteServiceUnavailable(message),
        OpenAIError::Api { status, message } => AnalysisError::RemoteServiceError {
            status: Some(status),
            message,
        },
        OpenAIError::EmptyResponse(message) | OpenAIError::Parse(message) => {
            AnalysisError::ModelResponseMalformed(message)
        }
        OpenAIError::Config(message) => AnalysisError::RemoteServiceError {
            status: None,
            message,
        },
    }
}

#[async_trait]
impl LanguageModel for OpenAIModel {
    fn name(&self) -> &str {
        &self.model
    }

    fn supports_vision(&self) -> bool {
        self.vision_model.is_some()
    }

    async fn complete(&self, request: ModelRequest) -> Result<String> {
        let (model, user) = match (&request.image, &self.vision_model) {
            (Some(image), Some(vision)) => (
                vision.clone(),
                Message::user_with_image(request.prompt.clone(), image.clone()),
            ),
            _ => (self.model.clone(), Message::user(request.prompt.clone())),
        };

        let mut chat = ChatRequest::new(model)
            .message(Message::system(request.system.clone()))
            .message(user)
            .temperature(request.temperature)
            .token_limit(request.max_tokens);
        if request.json {
            chat = chat.json_mode();
        }

        let response = self.client.chat_completion(chat).await.map_err(map_error)?;
        if request.json {
            return Ok(strip_code_blocks(&response.content).to_string());
        }
        Ok(response.content)
    }
}
