//! Category detection.
//!
//! Pure and synchronous. File name extension wins, then the declared MIME
//! type, then a MIME type guessed from the name, then any URL the input
//! carries. Inputs matching nothing are `unknown`.

use tracing::debug;

use crate::error::AnalysisError;
use crate::platforms::category_for_url;
use crate::text::extension;
use crate::types::{AnalysisInput, ContentCategory, Source};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "tif", "tiff", "heic", "avif", "ico",
];

/// Classify an input.
pub fn detect(input: &AnalysisInput) -> ContentCategory {
    match try_detect(input) {
        Ok(category) => category,
        Err(err) => {
            debug!(error = %err, "Detection ambiguous, using unknown");
            ContentCategory::Unknown
        }
    }
}

fn try_detect(input: &AnalysisInput) -> Result<ContentCategory, AnalysisError> {
    if let Source::File(file) = input.source() {
        if let Some(category) = category_for_extension(&file.name) {
            return Ok(category);
        }
        if let Some(category) = file.mime_type().and_then(category_for_mime) {
            return Ok(category);
        }
        if let Some(category) = mime_guess::from_path(&file.name)
            .first()
            .and_then(|mime| category_for_mime(mime.essence_str()))
        {
            return Ok(category);
        }
    }

    input
        .url_like()
        .and_then(category_for_url)
        .ok_or_else(|| AnalysisError::DetectionAmbiguous {
            input: input.label().to_string(),
        })
}

fn category_for_extension(name: &str) -> Option<ContentCategory> {
    let ext = extension(name)?;
    if ext == "pdf" {
        Some(ContentCategory::Pdf)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(ContentCategory::Image)
    } else {
        None
    }
}

fn category_for_mime(mime: &str) -> Option<ContentCategory> {
    let mime = mime.trim().to_ascii_lowercase();
    if mime == "application/pdf" || mime.ends_with("/pdf") {
        Some(ContentCategory::Pdf)
    } else if mime.starts_with("image/") {
        Some(ContentCategory::Image)
    } else {
        None
    }
}
