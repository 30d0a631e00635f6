//! Local AI strategy: prompt a language model directly.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::parse::parse_response;
use super::prompts::build_request;
use super::{AttemptContext, Generated, GenerationStrategy};
use crate::error::StrategyError;
use crate::traits::LanguageModel;
use crate::types::{AnalysisMethod, Capabilities};

/// Second stage of the chain.
pub struct ModelStrategy {
    model: Arc<dyn LanguageModel>,
}

impl ModelStrategy {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl GenerationStrategy for ModelStrategy {
    fn name(&self) -> &'static str {
        "model"
    }

    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::LocalAi
    }

    fn is_available(&self, capabilities: &Capabilities) -> bool {
        capabilities.local_ai
    }

    async fn attempt(&self, ctx: &AttemptContext<'_>) -> Result<Generated, StrategyError> {
        let vision = ctx.vision && self.model.supports_vision();
        let (kind, request) = build_request(ctx.input, ctx.category, ctx.content, vision);
        debug!(model = %self.model.name(), prompt = ?kind, "Prompting language model");

        let answer = self.model.complete(request).await?;
        let (title, description) = parse_response(&answer)?;
        Ok(Generated::new(title, description).with_preview(ctx.content.map(|c| c.preview())))
    }
}
