//! What the pipeline can do with the current configuration.

use serde::{Deserialize, Serialize};

use super::category::ContentCategory;

/// Capability snapshot, recomputed on every analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Remote analysis service will be attempted
    pub advanced_ai: bool,

    /// A language model credential is configured
    pub local_ai: bool,

    /// Images can be sent to a vision model
    pub vision: bool,

    pub pdf_text_extraction: bool,

    /// Link pages are fetched for metadata
    pub link_metadata: bool,

    /// Always true: the heuristic stage needs nothing
    pub fallback_analysis: bool,

    pub supported_categories: Vec<ContentCategory>,
}

impl Capabilities {
    /// Heuristic-only capabilities.
    pub fn heuristic_only() -> Self {
        Self {
            advanced_ai: false,
            local_ai: false,
            vision: false,
            pdf_text_extraction: false,
            link_metadata: false,
            fallback_analysis: true,
            supported_categories: ContentCategory::ALL.to_vec(),
        }
    }
}
