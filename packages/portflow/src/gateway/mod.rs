//! Publish/fetch gateway.
//!
//! Publishing writes to the remote store when one is configured and falls
//! back to the offline store on any create or insert failure. Fetching
//! looks remotely first, then offline.

pub mod slug;

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, GatewayError, StoreError, StoreResult};
use crate::stores::{LocalStore, MemoryStore, SupabaseStore};
use crate::traits::PortfolioStore;
use crate::types::config::DEFAULT_PUBLIC_URL;
use crate::types::{
    FetchOutcome, ItemSource, PersistenceMethod, PipelineConfig, PortfolioItem,
    PortfolioItemRecord, PortfolioMetadata, PortfolioRecord, PublishOutcome,
};

pub use slug::{generate_slug, storage_path, SLUG_LEN};

/// Persists portfolios and reads them back by slug.
pub struct PortfolioGateway {
    remote: Option<Arc<dyn PortfolioStore>>,
    offline: Arc<dyn PortfolioStore>,
    public_base_url: String,
}

impl PortfolioGateway {
    /// Offline-only gateway.
    pub fn new(offline: Arc<dyn PortfolioStore>) -> Self {
        Self {
            remote: None,
            offline,
            public_base_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }

    /// Supabase when storage is configured, files when `offline_dir` is set,
    /// memory otherwise.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let offline: Arc<dyn PortfolioStore> = match &config.offline_dir {
            Some(dir) => Arc::new(LocalStore::new(dir.clone())),
            None => Arc::new(MemoryStore::new()),
        };
        let gateway = Self::new(offline).with_public_base_url(config.public_base_url.clone());
        match &config.storage {
            Some(storage) => {
                gateway.with_remote(Arc::new(SupabaseStore::new(storage, config.timeouts.remote)))
            }
            None => gateway,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn PortfolioStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Shareable link for a slug.
    pub fn share_url(&self, slug: &str) -> String {
        format!("{}/portfolio/{slug}", self.public_base_url)
    }

    /// Publish items under a fresh slug.
    pub async fn publish(
        &self,
        items: &[PortfolioItem],
        metadata: PortfolioMetadata,
    ) -> Result<PublishOutcome, GatewayError> {
        let slug = generate_slug();

        if let Some(remote) = &self.remote {
            match self.save(remote.as_ref(), &slug, items, &metadata, false).await {
                Ok((portfolio, rows)) => {
                    info!(slug = %slug, items = rows.len(), "Published portfolio");
                    return Ok(self.outcome(slug, PersistenceMethod::Remote, portfolio, rows));
                }
                Err(e) => {
                    let err = AnalysisError::PersistenceUnavailable(e.to_string());
                    warn!(store = remote.name(), error = %err, "Remote publish failed, saving offline");
                }
            }
        }

        let (portfolio, rows) = self
            .save(self.offline.as_ref(), &slug, items, &metadata, true)
            .await
            .map_err(GatewayError::PersistenceUnavailable)?;
        info!(slug = %slug, items = rows.len(), "Saved portfolio offline");
        Ok(self.outcome(slug, PersistenceMethod::Offline, portfolio, rows))
    }

    /// Portfolio and items for a slug.
    pub async fn fetch(&self, slug: &str) -> Result<FetchOutcome, GatewayError> {
        if let Some(remote) = &self.remote {
            match Self::load(remote.as_ref(), slug).await {
                Ok(Some((portfolio, items))) => {
                    return Ok(FetchOutcome {
                        portfolio,
                        items,
                        method: PersistenceMethod::Remote,
                    });
                }
                Ok(None) => debug!(slug, "Not found remotely, checking offline"),
                Err(e) => {
                    warn!(store = remote.name(), error = %e, "Remote fetch failed, checking offline");
                }
            }
        }

        match Self::load(self.offline.as_ref(), slug).await {
            Ok(Some((portfolio, items))) => Ok(FetchOutcome {
                portfolio,
                items,
                method: PersistenceMethod::Offline,
            }),
            Ok(None) | Err(StoreError::InvalidKey(_)) => Err(GatewayError::NotFound {
                slug: slug.to_string(),
            }),
            Err(e) => Err(GatewayError::PersistenceUnavailable(e)),
        }
    }

    fn outcome(
        &self,
        slug: String,
        method: PersistenceMethod,
        portfolio: PortfolioRecord,
        items: Vec<PortfolioItemRecord>,
    ) -> PublishOutcome {
        PublishOutcome {
            url: self.share_url(&slug),
            slug,
            method,
            portfolio,
            items,
        }
    }

    async fn save(
        &self,
        store: &dyn PortfolioStore,
        slug: &str,
        items: &[PortfolioItem],
        metadata: &PortfolioMetadata,
        offline: bool,
    ) -> StoreResult<(PortfolioRecord, Vec<PortfolioItemRecord>)> {
        let mut record = PortfolioRecord::new(slug, metadata);
        record.offline = offline;
        let portfolio = store.create_portfolio(record).await?;

        let rows = join_all(items.iter().enumerate().map(|(index, item)| {
            item_record(store, &portfolio.id, index, item, offline)
        }))
        .await;
        let rows = store.insert_items(rows).await?;
        Ok((portfolio, rows))
    }

    async fn load(
        store: &dyn PortfolioStore,
        slug: &str,
    ) -> StoreResult<Option<(PortfolioRecord, Vec<PortfolioItemRecord>)>> {
        let Some(portfolio) = store.find_portfolio(slug).await? else {
            return Ok(None);
        };
        let items = store.list_items(&portfolio.id).await?;
        Ok(Some((portfolio, items)))
    }
}

/// Row for one item, uploading its bytes first. A failed upload leaves the
/// row without a file URL.
async fn item_record(
    store: &dyn PortfolioStore,
    portfolio_id: &str,
    index: usize,
    item: &PortfolioItem,
    offline: bool,
) -> PortfolioItemRecord {
    let (url, file_url, file_name) = match &item.source {
        ItemSource::Url { url } => (Some(url.clone()), None, None),
        ItemSource::File(file) => {
            let file_url = if file.bytes.is_empty() {
                file.location.clone()
            } else {
                let path = storage_path(portfolio_id, &file.name, Utc::now().timestamp_millis());
                let content_type = file
                    .mime_type()
                    .map(str::to_string)
                    .or_else(|| mime_guess::from_path(&file.name).first().map(|m| m.to_string()))
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                match store.upload_file(&path, file.bytes.clone(), &content_type).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(file = %file.name, error = %e, "File upload failed, saving item without it");
                        None
                    }
                }
            };
            (None, file_url, Some(file.name.clone()))
        }
    };

    PortfolioItemRecord {
        id: String::new(),
        portfolio_id: portfolio_id.to_string(),
        title: item.title.clone(),
        description: item.description.clone(),
        notes: item.notes.clone(),
        item_type: item.category,
        url,
        file_url,
        file_name,
        sort_order: index as u32,
        created_at: Utc::now(),
        offline,
    }
}
