//! Image descriptions from the file name and MIME type.
//!
//! No pixels are read. The remote model strategy is the place where an image
//! is actually looked at.

use crate::text::{format_size, matches_vocabulary, strip_extension, tokens};
use crate::types::{FileSource, ImageContent, ImageKind};

struct ImageRule {
    keywords: &'static [&'static str],
    kind: ImageKind,
    hints: &'static [&'static str],
}

const IMAGE_RULES: &[ImageRule] = &[
    ImageRule {
        keywords: &["screenshot", "screen"],
        kind: ImageKind::Screenshot,
        hints: &["interface", "application", "website", "digital"],
    },
    ImageRule {
        keywords: &["mockup", "wireframe", "prototype"],
        kind: ImageKind::Mockup,
        hints: &["design", "ui", "wireframe", "planning"],
    },
    ImageRule {
        keywords: &["logo", "brand", "identity"],
        kind: ImageKind::Branding,
        hints: &["branding", "logo", "identity", "corporate"],
    },
    ImageRule {
        keywords: &["ui", "interface", "dashboard"],
        kind: ImageKind::Interface,
        hints: &["ui", "interface", "dashboard", "user experience"],
    },
    ImageRule {
        keywords: &["web", "website", "landing"],
        kind: ImageKind::Web,
        hints: &["web", "website", "design", "layout"],
    },
];

const VECTOR_HINTS: &[&str] = &["vector", "graphic", "scalable", "technical"];
const RENDER_RULE: ImageRule = ImageRule {
    keywords: &["render", "3d"],
    kind: ImageKind::Render,
    hints: &["3d", "render", "visualization", "modeling"],
};
const GENERIC_HINTS: &[&str] = &["design", "visual", "creative", "professional"];

/// Image kind and hint tags for a file.
///
/// Name keywords are checked first, then an SVG MIME type, then render/3D.
pub fn classify(file: &FileSource) -> (ImageKind, Vec<String>) {
    let words = tokens(strip_extension(&file.name));
    let is_svg = file
        .mime_type()
        .map(|m| m.to_ascii_lowercase().contains("svg"))
        .unwrap_or(false);

    let (kind, hints) = if let Some(rule) = IMAGE_RULES
        .iter()
        .find(|rule| matches_vocabulary(&words, rule.keywords))
    {
        (rule.kind, rule.hints)
    } else if is_svg {
        (ImageKind::Vector, VECTOR_HINTS)
    } else if matches_vocabulary(&words, RENDER_RULE.keywords) {
        (RENDER_RULE.kind, RENDER_RULE.hints)
    } else {
        (ImageKind::Generic, GENERIC_HINTS)
    };
    (kind, hints.iter().map(|h| h.to_string()).collect())
}

fn kind_description(kind: ImageKind, size: &str) -> String {
    match kind {
        ImageKind::Screenshot => format!("Application or website screenshot ({size}). Captures user interface, functionality, or web content. Demonstrates digital product or website features."),
        ImageKind::Mockup => format!("Design mockup or wireframe ({size}). Shows user interface design, layout structure, and visual planning. Professional design documentation."),
        ImageKind::Branding => format!("Logo or branding design ({size}). Professional brand identity work featuring visual design and corporate identity elements."),
        ImageKind::Interface => format!("User interface design ({size}). Shows application interface, dashboard, or digital product design. Professional UI/UX work."),
        ImageKind::Web => format!("Web design project ({size}). Website or web application design showing layout, visual design, and user experience work."),
        ImageKind::Vector => format!("Vector graphic design ({size}). Scalable vector artwork showing professional design skills and technical expertise."),
        ImageKind::Render => format!("3D render or visualization ({size}). Professional 3D modeling, rendering, or visualization work demonstrating technical and artistic skills."),
        ImageKind::Generic => format!("Visual design content ({size}). Professional creative work showcasing design skills and artistic expertise."),
    }
}

/// Synthetic description of an image file.
pub fn describe(file: &FileSource) -> ImageContent {
    let (kind, hints) = classify(file);
    ImageContent {
        text: kind_description(kind, &format_size(file.size() as u64)),
        hints,
        kind,
        has_text: false,
    }
}
