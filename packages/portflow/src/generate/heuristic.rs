//! Template-based titles and descriptions.
//!
//! Needs no network and cannot fail, so it ends every strategy chain.

use async_trait::async_trait;

use super::{AttemptContext, Generated, GenerationStrategy};
use crate::error::StrategyError;
use crate::platforms::describe_url;
use crate::text::{humanize, project_context, strip_extension, truncate_chars};
use crate::types::{
    AnalysisMethod, Capabilities, ContentCategory, DocumentKind, ExtractedContent, Source,
    TextSource,
};

/// Longest fetched page title used as an item title.
pub const MAX_PAGE_TITLE_CHARS: usize = 60;

/// Link descriptions shorter than this get a closing sentence.
pub const MIN_LINK_DESCRIPTION_CHARS: usize = 50;

const LINK_PADDING: &str = " Features professional implementation and user-focused design principles.";

/// Deterministic fallback strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Always produces a non-empty title and description.
    pub fn generate(&self, ctx: &AttemptContext<'_>) -> Generated {
        let title = Some(self.title(ctx))
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| ctx.category.default_title().to_string());
        let context = project_context(ctx.input.notes());

        let description = match (ctx.category, ctx.content) {
            (ContentCategory::Pdf, content) => pdf_description(content, context),
            (ContentCategory::Image, content) => image_description(content, context),
            (category, content) if category.is_link() => link_description(ctx, content, context),
            _ => basic_description(&title, context),
        };

        Generated::new(title, description).with_preview(ctx.content.map(|c| c.preview()))
    }

    fn title(&self, ctx: &AttemptContext<'_>) -> String {
        if let Source::File(file) = ctx.input.source() {
            return humanize(strip_extension(&file.name));
        }
        match ctx.content {
            Some(ExtractedContent::Page(page)) => {
                truncate_chars(page.best_title().trim(), MAX_PAGE_TITLE_CHARS).to_string()
            }
            _ => ctx
                .input
                .url_like()
                .map(|url| describe_url(url).title)
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl GenerationStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::Heuristic
    }

    fn is_available(&self, _capabilities: &Capabilities) -> bool {
        true
    }

    async fn attempt(&self, ctx: &AttemptContext<'_>) -> Result<Generated, StrategyError> {
        Ok(self.generate(ctx))
    }
}

fn document_noun(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Resume => "Professional resume",
        DocumentKind::Portfolio => "Design portfolio document",
        DocumentKind::Proposal => "Project proposal document",
        DocumentKind::Report => "Professional report",
        DocumentKind::Presentation => "Presentation deck",
        DocumentKind::Contract => "Formal agreement document",
        DocumentKind::Manual => "Reference guide",
        DocumentKind::Generic => "Professional PDF document",
    }
}

fn pdf_description(content: Option<&ExtractedContent>, context: &str) -> String {
    let (kind, has_text) = match content {
        Some(ExtractedContent::Document(doc)) => {
            (doc.kind, doc.source == TextSource::TextExtraction)
        }
        _ => (DocumentKind::Generic, false),
    };
    let body = if has_text {
        "Contains structured content and detailed information"
    } else {
        "Comprehensive documentation"
    };
    format!(
        "{} showcasing {context}. {body} demonstrating expertise and attention to detail.",
        document_noun(kind)
    )
}

fn image_description(content: Option<&ExtractedContent>, context: &str) -> String {
    let read_text = matches!(
        content,
        Some(ExtractedContent::Image(image)) if image.has_text && image.text.chars().count() > 10
    );
    if read_text {
        format!("Visual {context} featuring structured design elements and professional presentation. Contains detailed visual information and demonstrates strong design principles.")
    } else {
        format!("Visual {context} showcasing creative design work and visual communication skills. Professional visual content demonstrating artistic expertise and design thinking.")
    }
}

fn link_description(
    ctx: &AttemptContext<'_>,
    content: Option<&ExtractedContent>,
    context: &str,
) -> String {
    let mut description = match content {
        Some(ExtractedContent::Page(page)) if page.meta_description.is_some() || page.platform != "Website" => {
            page.best_description().trim().to_string()
        }
        Some(ExtractedContent::Page(_)) => web_based(context),
        _ => match ctx.input.url_like().map(describe_url) {
            Some(rule) if rule.platform != "Website" => rule.description,
            _ => web_based(context),
        },
    };
    if description.chars().count() < MIN_LINK_DESCRIPTION_CHARS {
        description.push_str(LINK_PADDING);
    }
    description
}

fn web_based(context: &str) -> String {
    format!("Web-based {context} demonstrating digital expertise and modern development practices.")
}

/// One of three templates, picked from the title so reruns agree.
fn basic_description(title: &str, context: &str) -> String {
    let variant = title.bytes().map(usize::from).sum::<usize>() % 3;
    match variant {
        0 => format!("Professional {context} demonstrating creative expertise and technical proficiency. Features innovative problem-solving and attention to detail."),
        1 => format!("Comprehensive {context} showcasing modern design principles and professional execution. Highlights skills in creative development and strategic thinking."),
        _ => format!("Strategic {context} reflecting expertise in creative solutions and professional delivery. Demonstrates strong technical skills and design methodology."),
    }
}
