//! Inputs to the analysis pipeline.

use serde::{Deserialize, Serialize};

/// A file or link submitted for analysis, plus optional user notes.
///
/// Immutable once built: the `with_*` methods consume and return a new value.
///
/// # Example
///
/// ```rust
/// use portflow::AnalysisInput;
///
/// let input = AnalysisInput::file("UX_Research_Notes.pdf", Vec::new())
///     .with_mime_type("application/pdf")
///     .with_notes("usability study for a mobile app");
/// assert_eq!(input.file_name(), Some("UX_Research_Notes.pdf"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    source: Source,
    notes: Option<String>,
}

/// Where the content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(FileSource),
    Url { url: String },
}

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    pub name: String,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Public URL of the uploaded file, when it has one
    #[serde(default)]
    pub location: Option<String>,
}

impl FileSource {
    /// Declared MIME type, ignoring blanks.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl AnalysisInput {
    /// A file input with its raw bytes (may be empty).
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: Source::File(FileSource {
                name: name.into(),
                mime_type: None,
                bytes: bytes.into(),
                location: None,
            }),
            notes: None,
        }
    }

    /// A link input.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            source: Source::Url { url: url.into() },
            notes: None,
        }
    }

    /// Attach free-text notes from the user.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Declare the MIME type of a file input. No effect on links.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        if let Source::File(file) = &mut self.source {
            file.mime_type = Some(mime_type.into());
        }
        self
    }

    /// Public URL of an uploaded file. No effect on links.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        if let Source::File(file) = &mut self.source {
            file.location = Some(location.into());
        }
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn as_file(&self) -> Option<&FileSource> {
        match &self.source {
            Source::File(file) => Some(file),
            Source::Url { .. } => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.as_file().map(|f| f.name.as_str())
    }

    /// The URL carried by the input: the link itself, or a file's location.
    pub fn url_like(&self) -> Option<&str> {
        match &self.source {
            Source::Url { url } => Some(url.as_str()),
            Source::File(file) => file.location.as_deref(),
        }
        .map(str::trim)
        .filter(|u| !u.is_empty())
    }

    /// Notes, trimmed; `None` when blank.
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Short label for logs.
    pub fn label(&self) -> &str {
        match &self.source {
            Source::File(file) => &file.name,
            Source::Url { url } => url,
        }
    }
}
