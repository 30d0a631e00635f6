//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use portflow without
//! making real model or storage calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use crate::error::{AnalysisError, Result, StoreError, StoreResult};
use crate::stores::MemoryStore;
use crate::traits::{LanguageModel, ModelRequest, PortfolioStore};
use crate::types::{PortfolioItemRecord, PortfolioRecord};

/// A scripted language model.
///
/// Answers are returned in the order they were added; once they run out the
/// last one repeats. Every request is recorded for assertions.
#[derive(Default)]
pub struct MockModel {
    answers: Arc<RwLock<VecDeque<Result<String>>>>,
    last: Arc<RwLock<Option<Result<String>>>>,
    requests: Arc<RwLock<Vec<ModelRequest>>>,
    vision: bool,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw answer.
    pub fn with_response(self, answer: impl Into<String>) -> Self {
        self.answers.write().unwrap().push_back(Ok(answer.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: AnalysisError) -> Self {
        self.answers.write().unwrap().push_back(Err(error));
        self
    }

    /// Claim vision support.
    pub fn with_vision(mut self, vision: bool) -> Self {
        self.vision = vision;
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_vision(&self) -> bool {
        self.vision
    }

    async fn complete(&self, request: ModelRequest) -> Result<String> {
        self.requests.write().unwrap().push(request);

        let next = self.answers.write().unwrap().pop_front();
        let mut last = self.last.write().unwrap();
        match next {
            Some(answer) => {
                *last = Some(answer.clone());
                answer
            }
            None => last.clone().unwrap_or_else(|| {
                Err(AnalysisError::ModelResponseMalformed("no scripted answer".into()))
            }),
        }
    }
}

/// Which operations a [`FailingStore`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Everything,
    Inserts,
    Uploads,
}

/// A store that fails on purpose, backed by a [`MemoryStore`] for the
/// operations it lets through.
pub struct FailingStore {
    inner: MemoryStore,
    fail_on: FailOn,
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FailingStore {
    /// Fails every operation.
    pub fn new() -> Self {
        Self::failing_on(FailOn::Everything)
    }

    pub fn failing_on(fail_on: FailOn) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on,
        }
    }

    /// Store holding whatever was let through.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, op: FailOn) -> StoreResult<()> {
        if self.fail_on == FailOn::Everything || self.fail_on == op {
            return Err(StoreError::Status {
                status: 503,
                message: "store unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn create_portfolio(&self, portfolio: PortfolioRecord) -> StoreResult<PortfolioRecord> {
        self.check(FailOn::Everything)?;
        self.inner.create_portfolio(portfolio).await
    }

    async fn insert_items(
        &self,
        items: Vec<PortfolioItemRecord>,
    ) -> StoreResult<Vec<PortfolioItemRecord>> {
        self.check(FailOn::Inserts)?;
        self.inner.insert_items(items).await
    }

    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<String> {
        self.check(FailOn::Uploads)?;
        self.inner.upload_file(path, bytes, content_type).await
    }

    async fn find_portfolio(&self, slug: &str) -> StoreResult<Option<PortfolioRecord>> {
        self.check(FailOn::Everything)?;
        self.inner.find_portfolio(slug).await
    }

    async fn list_items(&self, portfolio_id: &str) -> StoreResult<Vec<PortfolioItemRecord>> {
        self.check(FailOn::Everything)?;
        self.inner.list_items(portfolio_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_repeats_last_answer() {
        let model = MockModel::new().with_response("a").with_response("b");
        let req = || ModelRequest::new("s", "p");
        assert_eq!(model.complete(req()).await.unwrap(), "a");
        assert_eq!(model.complete(req()).await.unwrap(), "b");
        assert_eq!(model.complete(req()).await.unwrap(), "b");
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unscripted_model_fails() {
        let model = MockModel::new();
        assert!(model.complete(ModelRequest::new("s", "p")).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_store_modes() {
        let store = FailingStore::failing_on(FailOn::Uploads);
        assert!(store.upload_file("a", vec![], "text/plain").await.is_err());
        assert!(store.find_portfolio("abcdefgh").await.unwrap().is_none());

        let store = FailingStore::new();
        assert!(store.find_portfolio("abcdefgh").await.is_err());
    }
}
