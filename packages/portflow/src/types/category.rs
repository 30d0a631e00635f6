//! Content categories assigned by the detector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse content-type tag assigned once per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentCategory {
    Pdf,
    Image,
    Github,
    Figma,
    Behance,
    Dribbble,
    #[serde(alias = "link")]
    GenericLink,
    Unknown,
}

impl ContentCategory {
    /// Every category, in detection order.
    pub const ALL: [ContentCategory; 8] = [
        ContentCategory::Pdf,
        ContentCategory::Image,
        ContentCategory::Github,
        ContentCategory::Figma,
        ContentCategory::Behance,
        ContentCategory::Dribbble,
        ContentCategory::GenericLink,
        ContentCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Github => "github",
            Self::Figma => "figma",
            Self::Behance => "behance",
            Self::Dribbble => "dribbble",
            Self::GenericLink => "genericLink",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this category describes a web link.
    pub fn is_link(&self) -> bool {
        matches!(
            self,
            Self::Github | Self::Figma | Self::Behance | Self::Dribbble | Self::GenericLink
        )
    }

    /// Title used when nothing better can be derived from the input.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF Document",
            Self::Image => "Image File",
            Self::Github => "GitHub Repository",
            Self::Figma => "Figma Design",
            Self::Behance => "Behance Project",
            Self::Dribbble => "Dribbble Shot",
            Self::GenericLink => "Web Project",
            Self::Unknown => "Creative Project",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&ContentCategory::GenericLink).unwrap();
        assert_eq!(json, "\"genericLink\"");
    }

    #[test]
    fn test_accepts_link_alias() {
        let cat: ContentCategory = serde_json::from_str("\"link\"").unwrap();
        assert_eq!(cat, ContentCategory::GenericLink);
    }

    #[test]
    fn test_display_matches_serde_name() {
        for cat in ContentCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json.trim_matches('"'), cat.to_string());
        }
    }

    #[test]
    fn test_link_categories() {
        assert!(ContentCategory::Github.is_link());
        assert!(ContentCategory::GenericLink.is_link());
        assert!(!ContentCategory::Pdf.is_link());
        assert!(!ContentCategory::Unknown.is_link());
    }
}
