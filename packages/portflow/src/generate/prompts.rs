//! Prompts for the model strategy.
//!
//! Templates use `{placeholder}` substitution. Selection order: text read
//! from an image (only when a caller supplied it), vision, PDF text, link
//! metadata, then the generic prompt.

use base64::Engine;

use crate::text::truncate_chars;
use crate::traits::ModelRequest;
use crate::types::{AnalysisInput, ContentCategory, ExtractedContent, Source};

/// System role for every request.
pub const SYSTEM_PROMPT: &str = "You are a professional portfolio writer. Generate concise, impressive project descriptions for creative professionals. Always respond with valid JSON containing \"title\" and \"description\" fields.";

/// Image whose text was read out of the pixels.
pub const OCR_PROMPT: &str = r#"Summarize this image based on the extracted text. Write a short title and a 1-sentence description.

Extracted text: "{text}"

File: {file}
Additional notes: {notes}

Generate a JSON response with this format:
{
  "title": "3-6 word title",
  "description": "Professional 1-2 sentence description for a portfolio"
}"#;

/// Image sent to a vision model.
pub const VISION_PROMPT: &str = r#"You're helping someone organize their creative and professional portfolio. Analyze the visual content of this image and generate:
- A descriptive title (3-6 words)
- A 1-2 sentence description of what is shown, e.g. color, layout, subject matter, and what it likely represents (mockup, screenshot, artwork).

File: {file}
Additional notes: {notes}

Respond in JSON format:
{
  "title": "Professional title",
  "description": "Clear description of visual content"
}"#;

/// PDF with extracted or synthetic text.
pub const PDF_PROMPT: &str = r#"Generate a professional title and description for this PDF portfolio piece.

PDF Content:
"{text}"

File: {file}
Additional notes: {notes}

Generate a JSON response:
{
  "title": "Professional project title",
  "description": "Engaging 2-3 sentence description highlighting skills and impact"
}"#;

/// Link with page or platform metadata.
pub const URL_PROMPT: &str = r#"Generate a professional title and description for this web project.

URL: {url}
Platform: {platform}
Title: {title}
Description: {description}
Key content: {content}

Additional notes: {notes}

Generate a JSON response:
{
  "title": "Professional project title",
  "description": "Compelling 2-3 sentence description for a portfolio"
}"#;

const GENERIC_TAIL: &str = "Create an engaging description that highlights skills, impact, and professional value. Respond in JSON format:\n{\n  \"title\": \"Project title\",\n  \"description\": \"Professional description\"\n}";

/// Characters of page content quoted in the link prompt.
pub const URL_CONTENT_CHARS: usize = 1000;

/// Which prompt was chosen for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Ocr,
    Vision,
    PdfText,
    UrlMetadata,
    Generic,
}

/// Pick a prompt for the input and build the request.
pub fn build_request(
    input: &AnalysisInput,
    category: ContentCategory,
    content: Option<&ExtractedContent>,
    vision: bool,
) -> (PromptKind, ModelRequest) {
    let file = input.file_name().unwrap_or("Unknown");
    let notes = input.notes().unwrap_or("None");

    if let Some(ExtractedContent::Image(image)) = content.filter(|_| category == ContentCategory::Image) {
        if image.has_text {
            let prompt = OCR_PROMPT
                .replace("{text}", &image.text)
                .replace("{file}", file)
                .replace("{notes}", notes);
            return (PromptKind::Ocr, ModelRequest::new(SYSTEM_PROMPT, prompt));
        }
    }

    if category == ContentCategory::Image && vision {
        if let Some(image) = image_reference(input) {
            let prompt = VISION_PROMPT
                .replace("{file}", file)
                .replace("{notes}", notes);
            return (
                PromptKind::Vision,
                ModelRequest::new(SYSTEM_PROMPT, prompt).with_image(image),
            );
        }
    }

    match (category, content) {
        (ContentCategory::Pdf, Some(ExtractedContent::Document(doc))) => {
            let prompt = PDF_PROMPT
                .replace("{text}", &doc.text)
                .replace("{file}", file)
                .replace("{notes}", notes);
            (PromptKind::PdfText, ModelRequest::new(SYSTEM_PROMPT, prompt))
        }
        (category, Some(ExtractedContent::Page(page))) if category.is_link() => {
            let url = input.url_like().unwrap_or_default();
            let snippet = page.body_snippet.as_deref().unwrap_or("None");
            let prompt = URL_PROMPT
                .replace("{url}", url)
                .replace("{platform}", &page.platform)
                .replace("{title}", page.best_title())
                .replace("{description}", page.best_description())
                .replace("{content}", truncate_chars(snippet, URL_CONTENT_CHARS))
                .replace("{notes}", notes);
            (PromptKind::UrlMetadata, ModelRequest::new(SYSTEM_PROMPT, prompt))
        }
        _ => (
            PromptKind::Generic,
            ModelRequest::new(SYSTEM_PROMPT, generic_prompt(input, content)),
        ),
    }
}

/// The catch-all prompt built from whatever the input carries.
pub fn generic_prompt(input: &AnalysisInput, content: Option<&ExtractedContent>) -> String {
    let mut prompt =
        String::from("Generate a professional project title and description for a portfolio piece. ");

    if let Source::File(file) = input.source() {
        let mime = file.mime_type().unwrap_or("unknown type");
        prompt.push_str(&format!("File: \"{}\" ({mime}). ", file.name));
    }
    if let Some(url) = input.url_like() {
        prompt.push_str(&format!("Link: {url}. "));
    }
    if let Some(hints) = content.map(ExtractedContent::hints).filter(|h| !h.is_empty()) {
        prompt.push_str(&format!("Keywords: {}. ", hints.join(", ")));
    }
    if let Some(notes) = input.notes() {
        prompt.push_str(&format!("Additional context: {notes}. "));
    }

    prompt.push_str(GENERIC_TAIL);
    prompt
}

/// Public location of the image, else its bytes as a `data:` URL.
fn image_reference(input: &AnalysisInput) -> Option<String> {
    let file = input.as_file()?;
    if let Some(location) = file.location.as_deref().filter(|l| !l.trim().is_empty()) {
        return Some(location.trim().to_string());
    }
    if file.bytes.is_empty() {
        return None;
    }
    let mime = file
        .mime_type()
        .map(str::to_string)
        .or_else(|| mime_guess::from_path(&file.name).first().map(|m| m.to_string()))
        .unwrap_or_else(|| "image/jpeg".to_string());
    let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
    Some(format!("data:{mime};base64,{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        DocumentContent, DocumentKind, ImageContent, ImageKind, PageSummary, TextSource,
    };

    fn image(has_text: bool) -> ExtractedContent {
        ExtractedContent::Image(ImageContent {
            text: "Sign in to Acme".into(),
            hints: vec![],
            kind: ImageKind::Screenshot,
            has_text,
        })
    }

    #[test]
    fn test_ocr_wins_over_vision() {
        let input = AnalysisInput::file("login.png", vec![1, 2, 3]);
        let content = image(true);
        let (kind, request) =
            build_request(&input, ContentCategory::Image, Some(&content), true);
        assert_eq!(kind, PromptKind::Ocr);
        assert!(request.prompt.contains("Sign in to Acme"));
        assert!(request.image.is_none());
    }

    #[test]
    fn test_vision_uses_data_url() {
        let input = AnalysisInput::file("shot.png", vec![1, 2, 3]);
        let content = image(false);
        let (kind, request) =
            build_request(&input, ContentCategory::Image, Some(&content), true);
        assert_eq!(kind, PromptKind::Vision);
        assert_eq!(request.image.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[test]
    fn test_vision_prefers_location() {
        let input = AnalysisInput::file("shot.png", vec![1])
            .with_location("https://cdn.example.com/shot.png");
        let (kind, request) = build_request(&input, ContentCategory::Image, None, true);
        assert_eq!(kind, PromptKind::Vision);
        assert_eq!(
            request.image.as_deref(),
            Some("https://cdn.example.com/shot.png")
        );
    }

    #[test]
    fn test_image_without_vision_is_generic() {
        let input = AnalysisInput::file("shot.png", vec![1]).with_notes("mobile app");
        let content = image(false);
        let (kind, request) =
            build_request(&input, ContentCategory::Image, Some(&content), false);
        assert_eq!(kind, PromptKind::Generic);
        assert!(request.prompt.contains("File: \"shot.png\""));
        assert!(request.prompt.contains("Additional context: mobile app."));
        assert!(!request.prompt.contains("Keywords"));
    }

    #[test]
    fn test_generic_prompt_lists_hints() {
        let input = AnalysisInput::file("brand-logo.png", vec![1]);
        let content = ExtractedContent::Image(ImageContent {
            text: "Logo design".into(),
            hints: vec!["branding".into(), "identity".into()],
            kind: ImageKind::Branding,
            has_text: false,
        });
        let (kind, request) =
            build_request(&input, ContentCategory::Image, Some(&content), false);
        assert_eq!(kind, PromptKind::Generic);
        assert!(request.prompt.contains("Keywords: branding, identity."));
    }

    #[test]
    fn test_pdf_prompt() {
        let input = AnalysisInput::file("report.pdf", Vec::new());
        let content = ExtractedContent::Document(DocumentContent {
            text: "Quarterly findings".into(),
            hints: vec![],
            kind: DocumentKind::Report,
            source: TextSource::TextExtraction,
        });
        let (kind, request) = build_request(&input, ContentCategory::Pdf, Some(&content), false);
        assert_eq!(kind, PromptKind::PdfText);
        assert!(request.prompt.contains("\"Quarterly findings\""));
        assert!(request.prompt.contains("Additional notes: None"));
        assert_eq!(request.system, SYSTEM_PROMPT);
        assert!(request.json);
    }

    #[test]
    fn test_url_prompt_caps_content() {
        let input = AnalysisInput::url("https://example.com/app");
        let content = ExtractedContent::Page(PageSummary {
            platform: "Website".into(),
            platform_title: "App".into(),
            platform_description: "Professional web project at example.com.".into(),
            title: Some("Acme App".into()),
            meta_description: None,
            body_snippet: Some("x".repeat(3000)),
            fetched: true,
        });
        let (kind, request) =
            build_request(&input, ContentCategory::GenericLink, Some(&content), false);
        assert_eq!(kind, PromptKind::UrlMetadata);
        assert!(request.prompt.contains("Title: Acme App"));
        assert!(request.prompt.contains("URL: https://example.com/app"));
        assert!(!request.prompt.contains(&"x".repeat(URL_CONTENT_CHARS + 1)));
    }

    #[test]
    fn test_unknown_is_generic() {
        let input = AnalysisInput::file("archive.zip", vec![1]);
        let (kind, _) = build_request(&input, ContentCategory::Unknown, None, true);
        assert_eq!(kind, PromptKind::Generic);
    }
}
