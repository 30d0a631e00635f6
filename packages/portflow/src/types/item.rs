//! Portfolio items: an analysis result plus the user's edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::ContentCategory;
use super::input::{AnalysisInput, FileSource, Source};
use super::result::{AnalysisMethod, AnalysisResult};

/// One entry of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub notes: Option<String>,
    pub category: ContentCategory,
    pub method: AnalysisMethod,
    pub extracted_preview: Option<String>,
    pub source: ItemSource,
    pub created_at: DateTime<Utc>,
}

/// What the item points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemSource {
    File(FileSource),
    Url { url: String },
}

impl ItemSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url { url } => Some(url),
            Self::File(file) => file.location.as_deref(),
        }
    }

    pub fn file(&self) -> Option<&FileSource> {
        match self {
            Self::File(file) => Some(file),
            Self::Url { .. } => None,
        }
    }
}

impl From<&Source> for ItemSource {
    fn from(source: &Source) -> Self {
        match source {
            Source::File(file) => Self::File(file.clone()),
            Source::Url { url } => Self::Url { url: url.clone() },
        }
    }
}

impl PortfolioItem {
    /// Build an item from the input that was analyzed and its result.
    pub fn from_analysis(input: &AnalysisInput, result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: result.title,
            description: result.description,
            notes: input.notes().map(String::from),
            category: result.category,
            method: result.method,
            extracted_preview: result.extracted_preview,
            source: ItemSource::from(input.source()),
            created_at: Utc::now(),
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        Self {
            notes: Some(notes).filter(|n| !n.trim().is_empty()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PortfolioItem {
        let input = AnalysisInput::url("https://github.com/acme/widget").with_notes("my lib");
        let result = AnalysisResult::new(
            "Widget",
            "Open source code repository on GitHub.",
            ContentCategory::Github,
            AnalysisMethod::Heuristic,
        );
        PortfolioItem::from_analysis(&input, result)
    }

    #[test]
    fn test_from_analysis_keeps_fields() {
        let item = sample();
        assert_eq!(item.title, "Widget");
        assert_eq!(item.notes.as_deref(), Some("my lib"));
        assert_eq!(item.source.url(), Some("https://github.com/acme/widget"));
        assert_eq!(item.id.get_version_num(), 4);
    }

    #[test]
    fn test_edits_return_new_value_with_same_id() {
        let item = sample();
        let edited = item.clone().with_title("Widget Library").with_notes("  ");
        assert_eq!(edited.id, item.id);
        assert_eq!(edited.title, "Widget Library");
        assert_eq!(edited.notes, None);
        assert_eq!(item.title, "Widget");
    }
}
