//! Bounded content derived from an input by the extractor.

use serde::{Deserialize, Serialize};

use crate::text::truncate_chars;

/// Upper bound on the text handed to a prompt.
pub const MAX_SUMMARY_CHARS: usize = 4000;

/// Length of the preview returned alongside a result.
pub const PREVIEW_CHARS: usize = 100;

/// What the extractor learned about an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExtractedContent {
    Document(DocumentContent),
    Image(ImageContent),
    Page(PageSummary),
}

/// PDF content: real text or a synthetic description from the filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    pub text: String,
    pub hints: Vec<String>,
    pub kind: DocumentKind,
    pub source: TextSource,
}

/// Document flavour recognized from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Resume,
    Portfolio,
    Proposal,
    Report,
    Presentation,
    Contract,
    Manual,
    Generic,
}

/// How a document's text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextSource {
    TextExtraction,
    FilenameHeuristic,
}

/// Synthetic description of an image. No pixels are inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub text: String,
    pub hints: Vec<String>,
    pub kind: ImageKind,

    /// Set only by callers that supply text read from the image. The
    /// filename extractor never does, so it is `false` for built-in results.
    #[serde(default)]
    pub has_text: bool,
}

/// Image flavour recognized from the filename or MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageKind {
    Screenshot,
    Mockup,
    Branding,
    Interface,
    Web,
    Vector,
    Render,
    Generic,
}

/// What is known about a link: the platform rule, plus the fetched page if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub platform: String,
    pub platform_title: String,
    pub platform_description: String,

    /// `<title>` of the fetched page
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub body_snippet: Option<String>,

    /// Whether the page was actually retrieved
    pub fetched: bool,
}

impl PageSummary {
    /// Fetched title, else the platform title.
    pub fn best_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.platform_title)
    }

    /// Fetched meta description, else the platform description.
    pub fn best_description(&self) -> &str {
        self.meta_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.platform_description)
    }
}

impl ExtractedContent {
    /// Text handed to a prompt, capped at [`MAX_SUMMARY_CHARS`].
    pub fn summary(&self) -> String {
        let full = match self {
            Self::Document(doc) => doc.text.clone(),
            Self::Image(image) => image.text.clone(),
            Self::Page(page) => {
                let mut text = format!(
                    "Platform: {}\nTitle: {}\nDescription: {}",
                    page.platform,
                    page.best_title(),
                    page.best_description()
                );
                if let Some(snippet) = page.body_snippet.as_deref().filter(|s| !s.is_empty()) {
                    text.push_str("\nContent: ");
                    text.push_str(snippet);
                }
                text
            }
        };
        truncate_chars(&full, MAX_SUMMARY_CHARS).to_string()
    }

    /// First [`PREVIEW_CHARS`] characters of the summary followed by `...`.
    pub fn preview(&self) -> String {
        format!("{}...", truncate_chars(&self.summary(), PREVIEW_CHARS))
    }

    pub fn hints(&self) -> &[String] {
        match self {
            Self::Document(doc) => &doc.hints,
            Self::Image(image) => &image.hints,
            Self::Page(_) => &[],
        }
    }
}
