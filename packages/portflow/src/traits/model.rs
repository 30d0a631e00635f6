//! Language model trait used by the local AI strategy.

use async_trait::async_trait;

use crate::error::Result;

/// One chat-style request: a system instruction, a user prompt and an
/// optional image.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub prompt: String,

    /// Public URL or `data:` URL of an image to attach
    pub image: Option<String>,

    /// Ask for a single JSON object
    pub json: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ModelRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            image: None,
            json: true,
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A chat completion backend.
///
/// Implementations wrap a specific provider and return the raw text of the
/// first answer. Parsing that text is the caller's job.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Whether image input is supported.
    fn supports_vision(&self) -> bool {
        false
    }

    async fn complete(&self, request: ModelRequest) -> Result<String>;
}
