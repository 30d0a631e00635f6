//! Core types for the portflow pipeline.

pub mod capabilities;
pub mod category;
pub mod config;
pub mod content;
pub mod input;
pub mod item;
pub mod record;
pub mod result;

pub use capabilities::Capabilities;
pub use category::ContentCategory;
pub use config::{PdfStrategy, PipelineConfig, StorageConfig, Timeouts};
pub use content::{
    DocumentContent, DocumentKind, ExtractedContent, ImageContent, ImageKind, PageSummary,
    TextSource,
};
pub use input::{AnalysisInput, FileSource, Source};
pub use item::{ItemSource, PortfolioItem};
pub use record::{
    FetchOutcome, PersistenceMethod, PortfolioItemRecord, PortfolioMetadata, PortfolioRecord,
    PublishOutcome,
};
pub use result::{AnalysisMethod, AnalysisResult};
