//! Pipeline configuration.
//!
//! Everything the pipeline needs is passed in through [`PipelineConfig`] at
//! construction. [`PipelineConfig::from_env`] is a convenience for binaries;
//! nothing inside the pipeline reads the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::security::SecretString;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_USER_AGENT: &str = "Portflow Portfolio Builder";
pub const DEFAULT_BUCKET: &str = "portfolios";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

/// How PDF content is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfStrategy {
    /// Parse the bytes, falling back to the filename when that yields nothing
    #[default]
    TextExtraction,
    /// Describe the document from its filename only
    FilenameHeuristic,
}

impl FromStr for PdfStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "textextraction" | "text_extraction" => Ok(Self::TextExtraction),
            "filename" | "filenameheuristic" | "filename_heuristic" => {
                Ok(Self::FilenameHeuristic)
            }
            _ => Err(ConfigError::InvalidValue {
                key: "PORTFLOW_PDF_STRATEGY".into(),
                value: s.into(),
            }),
        }
    }
}

/// Remote storage (Supabase) settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub credential: SecretString,
    pub bucket: String,
}

impl StorageConfig {
    pub fn new(url: impl Into<String>, credential: impl Into<SecretString>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            credential: credential.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

/// Network timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub fetch: Duration,
    pub remote: Duration,
    pub model: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            fetch: Duration::from_secs(10),
            remote: Duration::from_secs(30),
            model: Duration::from_secs(60),
        }
    }
}

/// Configuration for the analysis pipeline and the publish gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Try the remote analysis service first
    pub remote_service_enabled: bool,

    /// URL of the remote `analyze-file` endpoint
    pub remote_endpoint: Option<String>,

    /// Let the remote service run against localhost endpoints.
    ///
    /// Off by default: a local preview server does not serve the endpoint.
    pub allow_local_remote: bool,

    /// Language model API key; enables the local AI strategy
    pub model_credential: Option<SecretString>,

    /// Chat model used for text prompts
    pub model: String,

    /// Model used for image prompts. Vision is off when `None`.
    pub vision_model: Option<String>,

    /// Remote storage; publishing is offline-only when `None`
    pub storage: Option<StorageConfig>,

    pub pdf_strategy: PdfStrategy,

    /// Fetch link pages for metadata
    pub fetch_urls: bool,

    pub timeouts: Timeouts,

    pub user_agent: String,

    /// Allow fetching loopback/private addresses
    pub allow_private_hosts: bool,

    /// Directory of the offline store. In-memory when `None`.
    pub offline_dir: Option<PathBuf>,

    /// Origin used to build share URLs
    pub public_base_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            remote_service_enabled: false,
            remote_endpoint: None,
            allow_local_remote: false,
            model_credential: None,
            model: DEFAULT_MODEL.to_string(),
            vision_model: None,
            storage: None,
            pdf_strategy: PdfStrategy::default(),
            fetch_urls: true,
            timeouts: Timeouts::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_hosts: false,
            offline_dir: None,
            public_base_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the remote analysis service at `endpoint`.
    pub fn with_remote_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.remote_endpoint = Some(endpoint.into());
        self.remote_service_enabled = true;
        self
    }

    pub fn with_remote_enabled(mut self, enabled: bool) -> Self {
        self.remote_service_enabled = enabled;
        self
    }

    pub fn with_allow_local_remote(mut self, allow: bool) -> Self {
        self.allow_local_remote = allow;
        self
    }

    pub fn with_model_credential(mut self, key: impl Into<SecretString>) -> Self {
        self.model_credential = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = Some(model.into());
        self
    }

    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_pdf_strategy(mut self, strategy: PdfStrategy) -> Self {
        self.pdf_strategy = strategy;
        self
    }

    pub fn with_fetch_urls(mut self, fetch: bool) -> Self {
        self.fetch_urls = fetch;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_allow_private_hosts(mut self, allow: bool) -> Self {
        self.allow_private_hosts = allow;
        self
    }

    pub fn with_offline_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.offline_dir = Some(dir.into());
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        config.remote_endpoint = get("PORTFLOW_ANALYZE_URL");
        config.remote_service_enabled = match get("PORTFLOW_REMOTE_ANALYSIS") {
            Some(raw) => parse_bool("PORTFLOW_REMOTE_ANALYSIS", &raw)?,
            None => config.remote_endpoint.is_some(),
        };
        config.model_credential = SecretString::from_optional(get("OPENAI_API_KEY"));
        if let Some(model) = get("PORTFLOW_MODEL") {
            config.model = model;
        }
        config.vision_model = get("PORTFLOW_VISION_MODEL");

        if let (Some(url), Some(key)) = (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            config.storage = Some(StorageConfig::new(url, key));
        }

        if let Some(raw) = get("PORTFLOW_PDF_STRATEGY") {
            config.pdf_strategy = raw.parse()?;
        }
        if let Some(raw) = get("PORTFLOW_FETCH_URLS") {
            config.fetch_urls = parse_bool("PORTFLOW_FETCH_URLS", &raw)?;
        }
        config.offline_dir = get("PORTFLOW_OFFLINE_DIR").map(PathBuf::from);
        if let Some(url) = get("PORTFLOW_PUBLIC_URL") {
            config = config.with_public_base_url(url);
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
