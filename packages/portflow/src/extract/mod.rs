//! Content extraction.
//!
//! Each category maps to one extractor in the static [`EXTRACTORS`] table.
//! Extraction is best effort: failures are logged and reported as absent
//! content, never as errors.

pub mod image;
pub mod page;
pub mod pdf;

use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::security::UrlPolicy;
use crate::types::{
    AnalysisInput, ContentCategory, ExtractedContent, PdfStrategy, PipelineConfig, Source,
};

pub use page::{PageFetcher, PageMetadata};

/// Which extractor handles a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    Document,
    Image,
    Link,
}

/// Category registrations. Categories missing here have no extractor.
pub static EXTRACTORS: &[(ContentCategory, ExtractorKind)] = &[
    (ContentCategory::Pdf, ExtractorKind::Document),
    (ContentCategory::Image, ExtractorKind::Image),
    (ContentCategory::Github, ExtractorKind::Link),
    (ContentCategory::Figma, ExtractorKind::Link),
    (ContentCategory::Behance, ExtractorKind::Link),
    (ContentCategory::Dribbble, ExtractorKind::Link),
    (ContentCategory::GenericLink, ExtractorKind::Link),
];

pub fn extractor_for(category: ContentCategory) -> Option<ExtractorKind> {
    EXTRACTORS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, kind)| *kind)
}

/// Derives bounded content from inputs.
#[derive(Debug, Clone)]
pub struct Extractor {
    pdf_strategy: PdfStrategy,
    fetcher: Option<PageFetcher>,
}

impl Extractor {
    pub fn new(config: &PipelineConfig) -> Self {
        let fetcher = config.fetch_urls.then(|| {
            PageFetcher::new(
                config.timeouts.fetch,
                config.user_agent.clone(),
                UrlPolicy::new().allow_private_hosts(config.allow_private_hosts),
            )
        });
        Self {
            pdf_strategy: config.pdf_strategy,
            fetcher,
        }
    }

    /// Extract content for an input of a known category.
    pub async fn extract(
        &self,
        input: &AnalysisInput,
        category: ContentCategory,
    ) -> Option<ExtractedContent> {
        let Some(kind) = extractor_for(category) else {
            debug!(%category, "No extractor registered");
            return None;
        };

        match self.run(kind, input, category).await {
            Ok(content) => content,
            Err(e) => {
                warn!(%category, error = %e, "Extraction failed, continuing without content");
                None
            }
        }
    }

    async fn run(
        &self,
        kind: ExtractorKind,
        input: &AnalysisInput,
        category: ContentCategory,
    ) -> Result<Option<ExtractedContent>, AnalysisError> {
        let missing = |what: &str| AnalysisError::ExtractionFailed {
            category,
            reason: format!("input has no {what}"),
        };

        match kind {
            ExtractorKind::Document => {
                let file = input.as_file().ok_or_else(|| missing("file"))?;
                let doc = match self.pdf_strategy {
                    PdfStrategy::FilenameHeuristic => pdf::describe_from_filename(file),
                    PdfStrategy::TextExtraction => {
                        let bytes = self.pdf_bytes(input, category).await;
                        pdf::extract_document(file, bytes).await
                    }
                };
                Ok(Some(ExtractedContent::Document(doc)))
            }
            ExtractorKind::Image => {
                let file = input.as_file().ok_or_else(|| missing("file"))?;
                Ok(Some(ExtractedContent::Image(image::describe(file))))
            }
            ExtractorKind::Link => {
                let url = input.url_like().ok_or_else(|| missing("URL"))?;
                let summary = page::summarize_link(url, category, self.fetcher.as_ref()).await;
                Ok(Some(ExtractedContent::Page(summary)))
            }
        }
    }

    /// The file's bytes, downloaded from its location when none were uploaded.
    async fn pdf_bytes(&self, input: &AnalysisInput, category: ContentCategory) -> Vec<u8> {
        let Source::File(file) = input.source() else {
            return Vec::new();
        };
        if !file.bytes.is_empty() {
            return file.bytes.clone();
        }
        match (&self.fetcher, file.location.as_deref()) {
            (Some(fetcher), Some(location)) => fetcher
                .fetch_bytes(location, category)
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "PDF download failed");
                    Vec::new()
                }),
            _ => Vec::new(),
        }
    }
}
