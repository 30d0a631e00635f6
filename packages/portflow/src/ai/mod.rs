//! [`LanguageModel`](crate::traits::LanguageModel) implementations.
//!
//! - `OpenAIModel` - OpenAI chat completions (requires `openai` feature)

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAIModel;
