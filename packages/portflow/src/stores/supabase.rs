//! Remote store: Supabase PostgREST tables and Storage bucket.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::security::SecretString;
use crate::traits::PortfolioStore;
use crate::types::{PortfolioItemRecord, PortfolioRecord, StorageConfig};

const PORTFOLIOS: &str = "/rest/v1/portfolios";
const PORTFOLIO_ITEMS: &str = "/rest/v1/portfolio_items";

/// Portfolio store backed by a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    key: SecretString,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(config: &StorageConfig, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.credential.clone(),
            bucket: config.bucket.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("apikey", self.key.expose())
            .header(AUTHORIZATION, format!("Bearer {}", self.key.expose()))
    }

    /// Public URL of an object in the bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.base_url, self.bucket
        )
    }

    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn insert<T>(&self, table: &str, rows: &T) -> StoreResult<Response>
    where
        T: serde::Serialize + ?Sized + Sync,
    {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::check(response).await
    }
}

#[async_trait]
impl PortfolioStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn create_portfolio(&self, portfolio: PortfolioRecord) -> StoreResult<PortfolioRecord> {
        let response = self.insert(PORTFOLIOS, &portfolio).await?;
        let rows: Vec<PortfolioRecord> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Unexpected("no portfolio row returned".into()))
    }

    async fn insert_items(
        &self,
        items: Vec<PortfolioItemRecord>,
    ) -> StoreResult<Vec<PortfolioItemRecord>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.insert(PORTFOLIO_ITEMS, &items).await?;
        let rows: Vec<PortfolioItemRecord> = response.json().await?;
        if rows.len() != items.len() {
            return Err(StoreError::Unexpected(format!(
                "expected {} item rows, got {}",
                items.len(),
                rows.len()
            )));
        }
        Ok(rows)
    }

    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<String> {
        let object = format!("/storage/v1/object/{}/{path}", self.bucket);
        debug!(object = %object, size = bytes.len(), "Uploading file");
        let response = self
            .request(Method::POST, &object)
            .header(CONTENT_TYPE, content_type)
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(self.public_url(path))
    }

    async fn find_portfolio(&self, slug: &str) -> StoreResult<Option<PortfolioRecord>> {
        let response = self
            .request(Method::GET, PORTFOLIOS)
            .query(&[
                ("select", "*".to_string()),
                ("slug", format!("eq.{slug}")),
                ("is_public", "eq.true".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<PortfolioRecord> = Self::check(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn list_items(&self, portfolio_id: &str) -> StoreResult<Vec<PortfolioItemRecord>> {
        let response = self
            .request(Method::GET, PORTFOLIO_ITEMS)
            .query(&[
                ("select", "*".to_string()),
                ("portfolio_id", format!("eq.{portfolio_id}")),
                ("order", "sort_order.asc".to_string()),
            ])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortfolioMetadata;
    use mockito::{Matcher, Server};

    fn store(server: &Server) -> SupabaseStore {
        SupabaseStore::new(
            &StorageConfig::new(server.url(), "anon-key"),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_create_portfolio_sends_auth_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/portfolios")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::PartialJson(serde_json::json!({"slug": "abcd1234"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 17, "slug": "abcd1234", "title": "T", "description": "D", "is_public": true, "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}]"#)
            .create_async()
            .await;

        let created = store(&server)
            .create_portfolio(PortfolioRecord::new("abcd1234", &PortfolioMetadata::default()))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(created.id, "17");
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/portfolios")
            .with_status(401)
            .with_body("invalid key")
            .create_async()
            .await;

        let err = store(&server)
            .create_portfolio(PortfolioRecord::new("abcd1234", &PortfolioMetadata::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/portfolios/17/1700000000000_logo.png")
            .match_header("content-type", "image/png")
            .with_status(200)
            .with_body(r#"{"Key": "portfolios/17/1700000000000_logo.png"}"#)
            .create_async()
            .await;

        let s = store(&server);
        let url = s
            .upload_file("17/1700000000000_logo.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(
            url,
            format!(
                "{}/storage/v1/object/public/portfolios/17/1700000000000_logo.png",
                server.url()
            )
        );
    }

    #[tokio::test]
    async fn test_find_portfolio_miss() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/rest/v1/portfolios")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("slug".into(), "eq.zzzzzzzz".into()),
                Matcher::UrlEncoded("is_public".into(), "eq.true".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        assert!(store(&server)
            .find_portfolio("zzzzzzzz")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_items_ordered_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/portfolio_items")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("portfolio_id".into(), "eq.17".into()),
                Matcher::UrlEncoded("order".into(), "sort_order.asc".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"id": 1, "portfolio_id": 17, "title": "A", "description": "B", "type": "pdf", "sort_order": 0, "created_at": "2024-01-01T00:00:00Z"}]"#)
            .create_async()
            .await;

        let items = store(&server).list_items("17").await.unwrap();
        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].portfolio_id, "17");
    }
}
