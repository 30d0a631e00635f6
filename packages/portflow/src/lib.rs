//! Portfolio Content Analysis Library
//!
//! Turns uploaded files and links into portfolio items with a title and a
//! description, then publishes them under a shareable slug.
//!
//! # Design
//!
//! - Every input gets a result: remote service, then a language model,
//!   then templates
//! - Backends are capability-gated from configuration, never assumed
//! - Publishing falls back to an offline store when the remote one fails
//!
//! # Usage
//!
//! ```rust,ignore
//! use portflow::{AnalysisInput, Analyzer, PipelineConfig, PortfolioGateway, PortfolioItem};
//!
//! let config = PipelineConfig::from_env()?;
//! let analyzer = Analyzer::new(config.clone());
//! let gateway = PortfolioGateway::from_config(&config);
//!
//! let input = AnalysisInput::file("Brand_Guide.pdf", bytes).with_notes("rebrand for a bakery");
//! let result = analyzer.analyze(&input).await;
//! let item = PortfolioItem::from_analysis(&input, result);
//!
//! let published = gateway.publish(&[item], Default::default()).await?;
//! println!("{}", published.url);
//! ```
//!
//! # Modules
//!
//! - [`detect`] - Content category detection
//! - [`extract`] - PDF, image and link extractors
//! - [`generate`] - Strategy chain producing titles and descriptions
//! - [`orchestrator`] - The [`Analyzer`] entry point
//! - [`gateway`] - Publish/fetch with offline fallback
//! - [`stores`] - Storage implementations (SupabaseStore, LocalStore, MemoryStore)
//! - [`security`] - Credential handling and outbound URL checks
//! - [`testing`] - Mock implementations for testing

pub mod detect;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod generate;
pub mod orchestrator;
pub mod platforms;
pub mod security;
pub mod stores;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{AnalysisError, ConfigError, GatewayError, StoreError};
pub use traits::{LanguageModel, ModelRequest, PortfolioStore};
pub use types::{
    AnalysisInput, AnalysisMethod, AnalysisResult, Capabilities, ContentCategory,
    ExtractedContent, FetchOutcome, FileSource, ItemSource, PdfStrategy, PersistenceMethod,
    PipelineConfig, PortfolioItem, PortfolioItemRecord, PortfolioMetadata, PortfolioRecord,
    PublishOutcome, Source, StorageConfig, Timeouts,
};

pub use detect::detect;
pub use gateway::{generate_slug, PortfolioGateway};
pub use generate::{
    AnalyzeFileRequest, AnalyzeFileResponse, Fallback, GenerationStrategy, RemoteAnalysisClient,
    StrategyChain,
};
pub use orchestrator::{Analyzer, AnalyzerBuilder};
pub use security::SecretString;

// Re-export stores
pub use stores::{LocalStore, MemoryStore, SupabaseStore};

#[cfg(feature = "openai")]
pub use ai::OpenAIModel;

// Re-export testing utilities
pub use testing::{FailOn, FailingStore, MockModel};
