//! PDF content: parsed text, or a description built from the filename.

use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::text::{
    collapse_whitespace, format_size, matches_vocabulary, strip_extension, tokens, truncate_chars,
};
use crate::types::{ContentCategory, DocumentContent, DocumentKind, FileSource, TextSource};

/// Upper bound on extracted document text.
pub const MAX_DOCUMENT_CHARS: usize = 2000;

struct DocumentRule {
    keywords: &'static [&'static str],
    kind: DocumentKind,
    hints: &'static [&'static str],
}

const DOCUMENT_RULES: &[DocumentRule] = &[
    DocumentRule {
        keywords: &["resume", "cv"],
        kind: DocumentKind::Resume,
        hints: &["career", "professional", "skills", "experience"],
    },
    DocumentRule {
        keywords: &["portfolio"],
        kind: DocumentKind::Portfolio,
        hints: &["creative", "design", "projects", "visual"],
    },
    DocumentRule {
        keywords: &["proposal", "pitch"],
        kind: DocumentKind::Proposal,
        hints: &["business", "project", "strategy", "planning"],
    },
    DocumentRule {
        keywords: &["report", "analysis"],
        kind: DocumentKind::Report,
        hints: &["analysis", "research", "findings", "professional"],
    },
    DocumentRule {
        keywords: &["presentation", "deck", "slides"],
        kind: DocumentKind::Presentation,
        hints: &["presentation", "visual", "communication", "slides"],
    },
    DocumentRule {
        keywords: &["contract", "agreement"],
        kind: DocumentKind::Contract,
        hints: &["legal", "business", "formal", "terms"],
    },
    DocumentRule {
        keywords: &["manual", "guide", "instructions"],
        kind: DocumentKind::Manual,
        hints: &["instructions", "guide", "reference", "educational"],
    },
];

const GENERIC_HINTS: &[&str] = &["professional", "document", "content"];

/// Document kind and topic hints recognized from a file name.
pub fn classify(name: &str) -> (DocumentKind, Vec<String>) {
    let words = tokens(strip_extension(name));
    let (kind, hints) = DOCUMENT_RULES
        .iter()
        .find(|rule| matches_vocabulary(&words, rule.keywords))
        .map(|rule| (rule.kind, rule.hints))
        .unwrap_or((DocumentKind::Generic, GENERIC_HINTS));
    (kind, hints.iter().map(|h| h.to_string()).collect())
}

fn kind_description(kind: DocumentKind, size: &str) -> String {
    match kind {
        DocumentKind::Resume => format!("Professional resume/CV document ({size}). Contains career experience, skills, education, and professional accomplishments. Well-structured presentation of qualifications and expertise."),
        DocumentKind::Portfolio => format!("Design portfolio document ({size}). Showcases creative work, project case studies, and design expertise. Features professional project presentations and creative achievements."),
        DocumentKind::Proposal => format!("Project proposal document ({size}). Contains project overview, methodology, timeline, and deliverables. Professional business document outlining project scope and approach."),
        DocumentKind::Report => format!("Professional report document ({size}). Contains detailed analysis, findings, and recommendations. Structured presentation of research and insights."),
        DocumentKind::Presentation => format!("Presentation document ({size}). Contains slide-based content with visual presentations and key information. Professional presentation materials."),
        DocumentKind::Contract => format!("Contract or agreement document ({size}). Contains legal or business terms, conditions, and formal documentation."),
        DocumentKind::Manual => format!("Manual or guide document ({size}). Contains instructions, procedures, and detailed documentation. Educational or reference material."),
        DocumentKind::Generic => format!("Professional PDF document ({size}). Contains structured content and detailed information demonstrating expertise and attention to detail."),
    }
}

/// Synthetic description of a PDF from its name and size.
pub fn describe_from_filename(file: &FileSource) -> DocumentContent {
    let (kind, hints) = classify(&file.name);
    DocumentContent {
        text: kind_description(kind, &format_size(file.size() as u64)),
        hints,
        kind,
        source: TextSource::FilenameHeuristic,
    }
}

/// Collapse whitespace and cap at [`MAX_DOCUMENT_CHARS`].
pub fn normalize_text(raw: &str) -> String {
    truncate_chars(&collapse_whitespace(raw), MAX_DOCUMENT_CHARS).to_string()
}

/// Parse text out of PDF bytes on a blocking thread.
///
/// `pdf-extract` can panic on malformed fonts; panics are contained and
/// reported as [`AnalysisError::ExtractionFailed`].
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, AnalysisError> {
    let failed = |reason: String| AnalysisError::ExtractionFailed {
        category: ContentCategory::Pdf,
        reason,
    };

    let parsed = tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }))
    })
    .await
    .map_err(|e| failed(format!("extraction task failed: {e}")))?;

    let raw = match parsed {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return Err(failed(e.to_string())),
        Err(_) => return Err(failed("parser panicked".into())),
    };

    let text = normalize_text(&raw);
    if text.is_empty() {
        return Err(failed("no text found".into()));
    }
    debug!(chars = text.chars().count(), "PDF text extracted");
    Ok(text)
}

/// Parsed text when possible, the filename description otherwise.
pub async fn extract_document(file: &FileSource, bytes: Vec<u8>) -> DocumentContent {
    if bytes.is_empty() {
        debug!(file = %file.name, "No PDF bytes, describing from filename");
        return describe_from_filename(file);
    }

    match extract_text(bytes).await {
        Ok(text) => {
            let (kind, hints) = classify(&file.name);
            DocumentContent {
                text,
                hints,
                kind,
                source: TextSource::TextExtraction,
            }
        }
        Err(e) => {
            warn!(file = %file.name, error = %e, "PDF text extraction failed, describing from filename");
            describe_from_filename(file)
        }
    }
}
