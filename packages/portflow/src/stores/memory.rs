//! In-memory portfolio store for tests and previews.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::PortfolioStore;
use crate::types::{PortfolioItemRecord, PortfolioRecord};

/// Keeps portfolios, items and files in process memory.
///
/// Data is lost on restart.
pub struct MemoryStore {
    portfolios: RwLock<HashMap<String, PortfolioRecord>>,
    items: RwLock<Vec<PortfolioItemRecord>>,
    files: RwLock<HashMap<String, Vec<u8>>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            portfolios: RwLock::new(HashMap::new()),
            items: RwLock::new(Vec::new()),
            files: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn portfolio_count(&self) -> usize {
        self.portfolios.read().unwrap().len()
    }

    pub fn item_count(&self) -> usize {
        self.items.read().unwrap().len()
    }

    /// Bytes stored at `path`, if any.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path).cloned()
    }

    fn assign_id(&self, id: &mut String) {
        if id.is_empty() {
            *id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        }
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_portfolio(&self, mut portfolio: PortfolioRecord) -> StoreResult<PortfolioRecord> {
        let mut portfolios = self.portfolios.write().unwrap();
        if portfolios.contains_key(&portfolio.slug) {
            return Err(StoreError::Status {
                status: 409,
                message: format!("slug already exists: {}", portfolio.slug),
            });
        }
        self.assign_id(&mut portfolio.id);
        portfolios.insert(portfolio.slug.clone(), portfolio.clone());
        Ok(portfolio)
    }

    async fn insert_items(
        &self,
        items: Vec<PortfolioItemRecord>,
    ) -> StoreResult<Vec<PortfolioItemRecord>> {
        let items: Vec<PortfolioItemRecord> = items
            .into_iter()
            .map(|mut item| {
                self.assign_id(&mut item.id);
                item
            })
            .collect();
        self.items.write().unwrap().extend(items.iter().cloned());
        Ok(items)
    }

    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> StoreResult<String> {
        self.files.write().unwrap().insert(path.to_string(), bytes);
        Ok(format!("memory://files/{path}"))
    }

    async fn find_portfolio(&self, slug: &str) -> StoreResult<Option<PortfolioRecord>> {
        Ok(self
            .portfolios
            .read()
            .unwrap()
            .get(slug)
            .filter(|p| p.is_public)
            .cloned())
    }

    async fn list_items(&self, portfolio_id: &str) -> StoreResult<Vec<PortfolioItemRecord>> {
        let mut items: Vec<PortfolioItemRecord> = self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|item| item.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.sort_order);
        Ok(items)
    }
}
