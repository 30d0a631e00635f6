//! Storage trait behind the publish/fetch gateway.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{PortfolioItemRecord, PortfolioRecord};

/// Where portfolios are persisted.
///
/// The remote implementation talks to a hosted database and object storage;
/// the offline ones keep everything local. The gateway only sees this trait.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Insert a portfolio row and return it with its assigned id.
    async fn create_portfolio(&self, portfolio: PortfolioRecord) -> StoreResult<PortfolioRecord>;

    /// Insert item rows and return them with their assigned ids.
    async fn insert_items(
        &self,
        items: Vec<PortfolioItemRecord>,
    ) -> StoreResult<Vec<PortfolioItemRecord>>;

    /// Store file bytes at `path` and return their public URL.
    async fn upload_file(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> StoreResult<String>;

    /// Public portfolio with this slug, if any.
    async fn find_portfolio(&self, slug: &str) -> StoreResult<Option<PortfolioRecord>>;

    /// Items of a portfolio ordered by `sort_order`.
    async fn list_items(&self, portfolio_id: &str) -> StoreResult<Vec<PortfolioItemRecord>>;
}
