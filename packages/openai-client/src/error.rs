//! Errors returned by [`crate::OpenAIClient`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Missing key or an HTTP client that could not be built
    #[error("openai client misconfigured: {0}")]
    Config(String),

    /// The request never got an HTTP answer
    #[error("openai request failed: {0}")]
    Network(String),

    #[error("openai returned {status}: {message}")]
    Api { status: u16, message: String },

    /// First choice carried no text
    #[error("openai returned no content: {0}")]
    EmptyResponse(String),

    /// 2xx body that is not a chat completion
    #[error("unreadable openai response: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Rate limits, server errors and transport failures may succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::EmptyResponse(_) | Self::Parse(_) => false,
        }
    }
}
