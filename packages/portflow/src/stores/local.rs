//! Offline store: JSON files in a directory.
//!
//! Layout:
//! - `portfolio_{slug}.json` holds the portfolio row
//! - `portfolio_items_{id}.json` holds that portfolio's item rows
//! - `files/{path}` holds uploaded bytes

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::traits::PortfolioStore;
use crate::types::{PortfolioItemRecord, PortfolioRecord};

/// Portfolio store backed by the local filesystem.
///
/// Clones share one write lock, so item files are never rewritten
/// concurrently from the same process.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
    writes: Arc<Mutex<()>>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn portfolio_path(&self, slug: &str) -> StoreResult<PathBuf> {
        validate_key(slug)?;
        Ok(self.dir.join(format!("portfolio_{slug}.json")))
    }

    fn items_path(&self, portfolio_id: &str) -> StoreResult<PathBuf> {
        validate_key(portfolio_id)?;
        Ok(self.dir.join(format!("portfolio_items_{portfolio_id}.json")))
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Slugs and ids become file names, so only `[A-Za-z0-9_-]` is allowed.
fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Relative path with no `..`, root or prefix components.
fn validate_relative(path: &str) -> StoreResult<&Path> {
    let candidate = Path::new(path);
    let safe = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(candidate)
    } else {
        Err(StoreError::InvalidKey(path.to_string()))
    }
}

#[async_trait]
impl PortfolioStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn create_portfolio(&self, mut portfolio: PortfolioRecord) -> StoreResult<PortfolioRecord> {
        let path = self.portfolio_path(&portfolio.slug)?;
        if portfolio.id.is_empty() {
            portfolio.id = format!("offline_{}", portfolio.slug);
        }
        let _guard = self.writes.lock().await;
        self.write_json(&path, &portfolio).await?;
        debug!(path = %path.display(), "Saved portfolio");
        Ok(portfolio)
    }

    async fn insert_items(
        &self,
        items: Vec<PortfolioItemRecord>,
    ) -> StoreResult<Vec<PortfolioItemRecord>> {
        let Some(portfolio_id) = items.first().map(|i| i.portfolio_id.clone()) else {
            return Ok(Vec::new());
        };
        if items.iter().any(|i| i.portfolio_id != portfolio_id) {
            return Err(StoreError::Unexpected(
                "items belong to more than one portfolio".into(),
            ));
        }

        let path = self.items_path(&portfolio_id)?;
        let inserted: Vec<PortfolioItemRecord> = items
            .into_iter()
            .map(|mut item| {
                if item.id.is_empty() {
                    item.id = format!("offline_item_{}", Uuid::new_v4().simple());
                }
                item
            })
            .collect();

        let _guard = self.writes.lock().await;
        let mut stored: Vec<PortfolioItemRecord> =
            Self::read_json(&path).await?.unwrap_or_default();

        stored.extend(inserted.iter().cloned());
        self.write_json(&path, &stored).await?;
        Ok(inserted)
    }

    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> StoreResult<String> {
        let relative = validate_relative(path)?;
        let target = self.dir.join("files").join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(format!("file://{}", target.display()))
    }

    async fn find_portfolio(&self, slug: &str) -> StoreResult<Option<PortfolioRecord>> {
        let path = self.portfolio_path(slug)?;
        let record: Option<PortfolioRecord> = Self::read_json(&path).await?;
        Ok(record.filter(|p| p.is_public))
    }

    async fn list_items(&self, portfolio_id: &str) -> StoreResult<Vec<PortfolioItemRecord>> {
        let path = self.items_path(portfolio_id)?;
        let mut items: Vec<PortfolioItemRecord> =
            Self::read_json(&path).await?.unwrap_or_default();
        items.sort_by_key(|item| item.sort_order);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentCategory, PortfolioMetadata};
    use chrono::Utc;

    fn item(portfolio_id: &str, sort_order: u32) -> PortfolioItemRecord {
        PortfolioItemRecord {
            id: String::new(),
            portfolio_id: portfolio_id.into(),
            title: "Widget".into(),
            description: "A widget".into(),
            notes: Some("note".into()),
            item_type: ContentCategory::Github,
            url: Some("https://github.com/acme/widget".into()),
            file_url: None,
            file_name: None,
            sort_order,
            created_at: Utc::now(),
            offline: true,
        }
    }

    #[tokio::test]
    async fn test_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let portfolio = store
            .create_portfolio(PortfolioRecord::new("k3x9q2ab", &PortfolioMetadata::new("Mine")))
            .await
            .unwrap();
        assert_eq!(portfolio.id, "offline_k3x9q2ab");
        assert!(dir.path().join("portfolio_k3x9q2ab.json").exists());

        let items = store
            .insert_items(vec![item(&portfolio.id, 1), item(&portfolio.id, 0)])
            .await
            .unwrap();
        assert!(items[0].id.starts_with("offline_item_"));
        assert!(dir
            .path()
            .join(format!("portfolio_items_{}.json", portfolio.id))
            .exists());

        let found = store.find_portfolio("k3x9q2ab").await.unwrap().unwrap();
        assert_eq!(found.title, "Mine");
        let listed = store.list_items(&found.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].sort_order, 0);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let portfolio = store
            .create_portfolio(PortfolioRecord::new("shared01", &PortfolioMetadata::default()))
            .await
            .unwrap();

        let writers = (0..16u32).map(|i| {
            let store = store.clone();
            let id = portfolio.id.clone();
            async move { store.insert_items(vec![item(&id, i)]).await.unwrap() }
        });
        futures::future::join_all(writers).await;

        let listed = store.list_items(&portfolio.id).await.unwrap();
        assert_eq!(listed.len(), 16);
        let mut ids: Vec<&str> = listed.iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_missing_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("not-created-yet"));
        assert!(store.find_portfolio("abcdefgh").await.unwrap().is_none());
        assert!(store.list_items("offline_1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(matches!(
            store.find_portfolio("../etc").await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.upload_file("../escape.txt", vec![1], "text/plain").await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let url = store
            .upload_file("offline_1/123_logo.png", vec![7, 7], "image/png")
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        let on_disk = std::fs::read(dir.path().join("files/offline_1/123_logo.png")).unwrap();
        assert_eq!(on_disk, vec![7, 7]);
    }
}
