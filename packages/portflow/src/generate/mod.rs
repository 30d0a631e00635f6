//! Description generation.
//!
//! An ordered chain of [`GenerationStrategy`] implementations: remote
//! analysis service, then a language model, then templates. Unavailable
//! strategies are skipped and failures are logged, so the chain always
//! produces a result.

pub mod heuristic;
pub mod model;
pub mod parse;
pub mod prompts;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::StrategyError;
use crate::types::{
    AnalysisInput, AnalysisMethod, AnalysisResult, Capabilities, ContentCategory,
    ExtractedContent,
};

pub use heuristic::HeuristicStrategy;
pub use model::ModelStrategy;
pub use remote::{
    AnalyzeFileRequest, AnalyzeFileResponse, Fallback, RemoteAnalysisClient,
    RemoteAnalysisStrategy,
};

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct AttemptContext<'a> {
    pub input: &'a AnalysisInput,
    pub category: ContentCategory,
    pub content: Option<&'a ExtractedContent>,

    /// Images may be sent to a vision model
    pub vision: bool,
}

impl<'a> AttemptContext<'a> {
    pub fn new(
        input: &'a AnalysisInput,
        category: ContentCategory,
        content: Option<&'a ExtractedContent>,
    ) -> Self {
        Self {
            input,
            category,
            content,
            vision: false,
        }
    }

    pub fn with_vision(mut self, vision: bool) -> Self {
        self.vision = vision;
        self
    }
}

/// Output of one successful strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub title: String,
    pub description: String,
    pub preview: Option<String>,
}

impl Generated {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: Option<String>) -> Self {
        self.preview = preview;
        self
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    fn into_result(self, category: ContentCategory, method: AnalysisMethod) -> AnalysisResult {
        AnalysisResult::new(self.title, self.description, category, method)
            .with_preview(self.preview)
    }
}

/// One way of producing a title and description.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Method reported on results from this strategy.
    fn method(&self) -> AnalysisMethod;

    fn is_available(&self, capabilities: &Capabilities) -> bool;

    async fn attempt(&self, ctx: &AttemptContext<'_>) -> Result<Generated, StrategyError>;
}

/// Strategies tried in order, ending in the heuristic.
#[derive(Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn GenerationStrategy>>,
    fallback: HeuristicStrategy,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy ahead of the heuristic.
    pub fn with_strategy(mut self, strategy: Arc<dyn GenerationStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Strategy names in order, heuristic last.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// First complete result from an available strategy.
    pub async fn run(&self, ctx: &AttemptContext<'_>, capabilities: &Capabilities) -> AnalysisResult {
        for strategy in &self.strategies {
            if !strategy.is_available(capabilities) {
                debug!(strategy = strategy.name(), "Strategy unavailable, skipping");
                continue;
            }

            match strategy.attempt(ctx).await {
                Ok(generated) if generated.is_complete() => {
                    info!(strategy = strategy.name(), category = %ctx.category, "Generated description");
                    return generated.into_result(ctx.category, strategy.method());
                }
                Ok(_) => {
                    warn!(strategy = strategy.name(), "Strategy returned an empty title or description");
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "Strategy failed, trying next");
                }
            }
        }

        self.heuristic(ctx)
    }

    /// The heuristic result for a context.
    pub fn heuristic(&self, ctx: &AttemptContext<'_>) -> AnalysisResult {
        self.fallback
            .generate(ctx)
            .into_result(ctx.category, AnalysisMethod::Heuristic)
    }
}

impl std::fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyChain")
            .field("strategies", &self.names())
            .finish()
    }
}
