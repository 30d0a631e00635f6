//! Analysis orchestrator: detect, extract, generate.
//!
//! # Example
//!
//! ```rust,ignore
//! use portflow::{AnalysisInput, Analyzer, PipelineConfig};
//!
//! let analyzer = Analyzer::new(PipelineConfig::from_env()?);
//! let result = analyzer
//!     .analyze(&AnalysisInput::url("https://github.com/acme/widget"))
//!     .await;
//! println!("{}: {}", result.title, result.description);
//! ```

use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::detect::detect;
use crate::error::{AnalysisError, Result};
use crate::extract::Extractor;
use crate::generate::{
    AttemptContext, ModelStrategy, RemoteAnalysisClient, RemoteAnalysisStrategy, StrategyChain,
};
use crate::security::is_local_preview;
use crate::traits::LanguageModel;
use crate::types::{AnalysisInput, AnalysisResult, Capabilities, ContentCategory, PdfStrategy, PipelineConfig};

/// Builds an [`Analyzer`], optionally with injected backends.
pub struct AnalyzerBuilder {
    config: PipelineConfig,
    model: Option<Arc<dyn LanguageModel>>,
    remote: Option<RemoteAnalysisClient>,
}

impl AnalyzerBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            model: None,
            remote: None,
        }
    }

    /// Use this model instead of the one derived from configuration.
    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Use this client instead of one built from `remote_endpoint`.
    pub fn with_remote_client(mut self, client: RemoteAnalysisClient) -> Self {
        self.remote = Some(client);
        self
    }

    pub fn build(self) -> Analyzer {
        let config = self.config;
        let model = self.model.or_else(|| default_model(&config));
        let remote = self.remote.or_else(|| {
            config
                .remote_endpoint
                .as_deref()
                .map(|endpoint| RemoteAnalysisClient::new(endpoint, config.timeouts.remote))
        });

        let mut chain = StrategyChain::new();
        if let Some(client) = remote.clone() {
            chain = chain.with_strategy(Arc::new(RemoteAnalysisStrategy::new(client)));
        }
        if let Some(model) = model.clone() {
            chain = chain.with_strategy(Arc::new(ModelStrategy::new(model)));
        }

        Analyzer {
            extractor: Extractor::new(&config),
            chain,
            remote_endpoint: remote.map(|r| r.endpoint().to_string()),
            model,
            config,
        }
    }
}

#[cfg(feature = "openai")]
fn default_model(config: &PipelineConfig) -> Option<Arc<dyn LanguageModel>> {
    crate::ai::OpenAIModel::from_config(config).map(|m| Arc::new(m) as Arc<dyn LanguageModel>)
}

#[cfg(not(feature = "openai"))]
fn default_model(_config: &PipelineConfig) -> Option<Arc<dyn LanguageModel>> {
    None
}

/// Turns inputs into titles and descriptions.
///
/// Never fails: every stage degrades to the next, ending in templates.
pub struct Analyzer {
    config: PipelineConfig,
    extractor: Extractor,
    chain: StrategyChain,
    model: Option<Arc<dyn LanguageModel>>,
    remote_endpoint: Option<String>,
}

impl Analyzer {
    pub fn new(config: PipelineConfig) -> Self {
        AnalyzerBuilder::new(config).build()
    }

    pub fn builder(config: PipelineConfig) -> AnalyzerBuilder {
        AnalyzerBuilder::new(config)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// What the current configuration allows.
    pub fn capabilities(&self) -> Capabilities {
        let local_ai = self.model.is_some() && self.config.model_credential.is_some();
        let vision = local_ai
            && self.config.vision_model.is_some()
            && self.model.as_ref().is_some_and(|m| m.supports_vision());

        Capabilities {
            advanced_ai: self.remote_allowed(),
            local_ai,
            vision,
            pdf_text_extraction: self.config.pdf_strategy == PdfStrategy::TextExtraction,
            link_metadata: self.config.fetch_urls,
            fallback_analysis: true,
            supported_categories: ContentCategory::ALL.to_vec(),
        }
    }

    /// Remote analysis gate: enabled, endpoint set, credential present and
    /// not a local preview host unless explicitly allowed.
    fn remote_allowed(&self) -> bool {
        let Some(endpoint) = self.remote_endpoint.as_deref() else {
            return false;
        };
        if !self.config.remote_service_enabled || self.config.model_credential.is_none() {
            return false;
        }
        if Url::parse(endpoint).is_err() {
            debug!(endpoint, "Remote endpoint does not parse");
            return false;
        }
        if is_local_preview(endpoint) && !self.config.allow_local_remote {
            debug!(endpoint, "Remote endpoint is a local preview host, skipping");
            return false;
        }
        true
    }

    /// Analyze one input.
    pub async fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        let capabilities = self.capabilities();

        let category = detect(input);
        debug!(%category, input = %input.label(), "Detected category");

        let content = self.extractor.extract(input, category).await;
        debug!(%category, extracted = content.is_some(), "Extraction finished");

        let ctx = AttemptContext::new(input, category, content.as_ref())
            .with_vision(capabilities.vision);
        let result = self.chain.run(&ctx, &capabilities).await;
        let result = self.normalize(result, &ctx);

        info!(
            category = %result.category,
            method = %result.method,
            title = %result.title,
            "Analysis complete"
        );
        result
    }

    /// Analyze one input, stopping early when `cancel` fires.
    pub async fn analyze_with_cancel(
        &self,
        input: &AnalysisInput,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
            result = self.analyze(input) => Ok(result),
        }
    }

    /// Analyze inputs concurrently. Results keep the input order.
    pub async fn analyze_batch(&self, inputs: &[AnalysisInput]) -> Vec<AnalysisResult> {
        join_all(inputs.iter().map(|input| self.analyze(input))).await
    }

    /// Trim, swap in the heuristic when anything is blank, append notes.
    fn normalize(&self, mut result: AnalysisResult, ctx: &AttemptContext<'_>) -> AnalysisResult {
        result.title = result.title.trim().to_string();
        result.description = result.description.trim().to_string();
        if !result.is_complete() {
            result = self.chain.heuristic(ctx);
        }

        if let Some(notes) = ctx.input.notes() {
            result.description = format!("{} Additional context: {notes}", result.description);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;
    use crate::types::AnalysisMethod;

    fn offline_config() -> PipelineConfig {
        PipelineConfig::default().with_fetch_urls(false)
    }

    #[test]
    fn test_heuristic_only_capabilities() {
        let analyzer = Analyzer::new(offline_config());
        let caps = analyzer.capabilities();
        assert!(!caps.advanced_ai);
        assert!(!caps.local_ai);
        assert!(caps.fallback_analysis);
        assert!(caps.pdf_text_extraction);
        assert!(!caps.link_metadata);
    }

    #[test]
    fn test_local_preview_gating() {
        let config = offline_config()
            .with_remote_endpoint("http://localhost:3000/api/analyze-file")
            .with_model_credential("sk-test");
        assert!(!Analyzer::new(config.clone()).capabilities().advanced_ai);

        let allowed = config.with_allow_local_remote(true);
        assert!(Analyzer::new(allowed).capabilities().advanced_ai);

        let hosted = offline_config()
            .with_remote_endpoint("https://portflow.example.com/api/analyze-file")
            .with_model_credential("sk-test");
        assert!(Analyzer::new(hosted.clone()).capabilities().advanced_ai);

        let disabled = hosted.with_remote_enabled(false);
        assert!(!Analyzer::new(disabled).capabilities().advanced_ai);
    }

    #[test]
    fn test_remote_needs_credential() {
        let config =
            offline_config().with_remote_endpoint("https://portflow.example.com/api/analyze-file");
        assert!(!Analyzer::new(config).capabilities().advanced_ai);
    }

    #[tokio::test]
    async fn test_model_skipped_without_credential() {
        let model = Arc::new(MockModel::new().with_response(r#"{"title":"T","description":"D"}"#));
        let analyzer = Analyzer::builder(offline_config())
            .with_model(model.clone())
            .build();

        let result = analyzer
            .analyze(&AnalysisInput::file("Brand_Guide.pdf", Vec::new()))
            .await;
        assert_eq!(result.method, AnalysisMethod::Heuristic);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_notes_appended_after_generation() {
        let model = Arc::new(
            MockModel::new().with_response(r#"{"title":"Acme","description":"A site."}"#),
        );
        let analyzer = Analyzer::builder(offline_config().with_model_credential("sk-test"))
            .with_model(model)
            .build();

        let input = AnalysisInput::url("https://example.com").with_notes("  built with Rust ");
        let result = analyzer.analyze(&input).await;
        assert_eq!(result.method, AnalysisMethod::LocalAi);
        assert_eq!(result.description, "A site. Additional context: built with Rust");
    }

    #[tokio::test]
    async fn test_whitespace_results_are_trimmed() {
        let model = Arc::new(
            MockModel::new().with_response(r#"{"title":"  Acme  ","description":" A site. "}"#),
        );
        let analyzer = Analyzer::builder(offline_config().with_model_credential("sk-test"))
            .with_model(model)
            .build();
        let result = analyzer.analyze(&AnalysisInput::url("https://example.com")).await;
        assert_eq!(result.title, "Acme");
        assert_eq!(result.description, "A site.");
    }

    #[tokio::test]
    async fn test_cancelled() {
        let analyzer = Analyzer::new(offline_config());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = analyzer
            .analyze_with_cancel(&AnalysisInput::url("https://example.com"), cancel)
            .await;
        assert_eq!(outcome, Err(AnalysisError::Cancelled));

        let outcome = analyzer
            .analyze_with_cancel(&AnalysisInput::url("https://example.com"), CancellationToken::new())
            .await;
        assert!(outcome.unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let analyzer = Analyzer::new(offline_config());
        let inputs = vec![
            AnalysisInput::file("first.pdf", Vec::new()),
            AnalysisInput::url("https://github.com/acme/second"),
            AnalysisInput::file("third.png", vec![1]),
        ];
        let results = analyzer.analyze_batch(&inputs).await;
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }
}
