//! Analysis results.

use serde::{Deserialize, Serialize};

use super::category::ContentCategory;

/// Which stage of the strategy chain produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisMethod {
    #[serde(rename = "remoteAI")]
    RemoteAi,
    #[serde(rename = "localAI")]
    LocalAi,
    #[serde(rename = "heuristic")]
    Heuristic,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteAi => "remoteAI",
            Self::LocalAi => "localAI",
            Self::Heuristic => "heuristic",
        }
    }
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title and description for one input.
///
/// `title` and `description` are never empty when returned by
/// [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub title: String,
    pub description: String,
    pub category: ContentCategory,
    pub method: AnalysisMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_preview: Option<String>,
}

impl AnalysisResult {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: ContentCategory,
        method: AnalysisMethod,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            method,
            extracted_preview: None,
        }
    }

    pub fn with_preview(mut self, preview: Option<String>) -> Self {
        self.extracted_preview = preview;
        self
    }

    /// Both title and description contain something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}
