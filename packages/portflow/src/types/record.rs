//! Persisted portfolio rows and publish/fetch outcomes.
//!
//! Field names follow the `portfolios` and `portfolio_items` tables
//! (snake_case), which is also the layout of the offline JSON files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::category::ContentCategory;

pub const DEFAULT_PORTFOLIO_TITLE: &str = "My Creative Portfolio";
pub const DEFAULT_PORTFOLIO_DESCRIPTION: &str = "A showcase of my professional work";

/// Caller-supplied portfolio metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PortfolioMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn title_or_default(&self) -> String {
        non_blank(&self.title).unwrap_or(DEFAULT_PORTFOLIO_TITLE).to_string()
    }

    pub fn description_or_default(&self) -> String {
        non_blank(&self.description)
            .unwrap_or(DEFAULT_PORTFOLIO_DESCRIPTION)
            .to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A row of the `portfolios` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    /// Assigned by the store; empty until created
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "id_string"
    )]
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub offline: bool,
}

impl PortfolioRecord {
    pub fn new(slug: impl Into<String>, metadata: &PortfolioMetadata) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            slug: slug.into(),
            title: metadata.title_or_default(),
            description: metadata.description_or_default(),
            is_public: true,
            created_at: now,
            updated_at: now,
            offline: false,
        }
    }
}

/// A row of the `portfolio_items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItemRecord {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "id_string"
    )]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub portfolio_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "type")]
    pub item_type: ContentCategory,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub sort_order: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub offline: bool,
}

/// Which store served a publish or fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMethod {
    Remote,
    Offline,
}

impl std::fmt::Display for PersistenceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Offline => "offline",
        })
    }
}

/// Result of publishing a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub url: String,
    pub slug: String,
    pub method: PersistenceMethod,
    pub portfolio: PortfolioRecord,
    pub items: Vec<PortfolioItemRecord>,
}

/// Result of fetching a portfolio by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub portfolio: PortfolioRecord,
    pub items: Vec<PortfolioItemRecord>,
    pub method: PersistenceMethod,
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept ids stored either as JSON numbers (bigint keys) or strings.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}
