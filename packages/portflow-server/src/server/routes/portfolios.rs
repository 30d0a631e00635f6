use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use base64::Engine;
use portflow::{
    detect, AnalysisInput, AnalysisMethod, AnalysisResult, ContentCategory, PersistenceMethod,
    PortfolioItem, PortfolioItemRecord, PortfolioMetadata, PortfolioRecord,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::app::AppState;
use crate::server::routes::ApiError;

/// Body of `POST /api/portfolios`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<PublishItem>,
}

/// One reviewed item. Either `url` or `fileName` identifies its source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishItem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub category: Option<ContentCategory>,
    #[serde(default)]
    pub method: Option<AnalysisMethod>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Base64 file contents
    #[serde(default)]
    pub file_buffer: Option<String>,
}

impl PublishItem {
    fn into_item(self, index: usize) -> Result<PortfolioItem, ApiError> {
        let bad = |reason: &str| ApiError::BadRequest(format!("item {index}: {reason}"));

        let mut input = match (self.file_name.as_deref(), self.url.as_deref()) {
            (Some(name), location) if !name.trim().is_empty() => {
                let bytes = match self.file_buffer.as_deref() {
                    Some(buffer) => base64::engine::general_purpose::STANDARD
                        .decode(buffer.trim())
                        .map_err(|_| bad("invalid fileBuffer"))?,
                    None => Vec::new(),
                };
                let input = AnalysisInput::file(name.trim(), bytes);
                let input = match self.mime_type {
                    Some(mime) => input.with_mime_type(mime),
                    None => input,
                };
                match location {
                    Some(location) => input.with_location(location),
                    None => input,
                }
            }
            (_, Some(url)) if !url.trim().is_empty() => AnalysisInput::url(url.trim()),
            _ => return Err(bad("url or fileName is required")),
        };
        if let Some(notes) = self.notes {
            input = input.with_notes(notes);
        }

        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(bad("title and description are required"));
        }
        let category = self.category.unwrap_or_else(|| detect(&input));
        let result = AnalysisResult::new(
            self.title.trim(),
            self.description.trim(),
            category,
            self.method.unwrap_or(AnalysisMethod::Heuristic),
        );
        Ok(PortfolioItem::from_analysis(&input, result))
    }
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub success: bool,
    pub url: String,
    pub slug: String,
    pub method: PersistenceMethod,
    pub items: Vec<PortfolioItemRecord>,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub success: bool,
    pub portfolio: PortfolioRecord,
    pub items: Vec<PortfolioItemRecord>,
    pub method: PersistenceMethod,
}

/// `POST /api/portfolios`
pub async fn publish_portfolio_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublishResponse>), ApiError> {
    let Json(request) = body?;
    if request.items.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one item is required".to_string(),
        ));
    }

    let items = request
        .items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.into_item(index))
        .collect::<Result<Vec<_>, _>>()?;
    let metadata = PortfolioMetadata {
        title: request.title,
        description: request.description,
    };

    let outcome = state.gateway.publish(&items, metadata).await?;
    info!(slug = %outcome.slug, method = %outcome.method, items = outcome.items.len(), "Portfolio published");

    Ok((
        StatusCode::CREATED,
        Json(PublishResponse {
            success: true,
            url: outcome.url,
            slug: outcome.slug,
            method: outcome.method,
            items: outcome.items,
        }),
    ))
}

/// `GET /api/portfolios/:slug`
pub async fn fetch_portfolio_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<FetchResponse>, ApiError> {
    let outcome = state.gateway.fetch(&slug).await?;
    Ok(Json(FetchResponse {
        success: true,
        portfolio: outcome.portfolio,
        items: outcome.items,
        method: outcome.method,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> Result<PortfolioItem, ApiError> {
        serde_json::from_value::<PublishItem>(json)
            .unwrap()
            .into_item(0)
    }

    #[test]
    fn test_link_item_detects_category() {
        let item = item(serde_json::json!({
            "title": "Widget",
            "description": "A library",
            "url": "https://github.com/acme/widget"
        }))
        .unwrap();
        assert_eq!(item.category, ContentCategory::Github);
        assert_eq!(item.source.url(), Some("https://github.com/acme/widget"));
    }

    #[test]
    fn test_file_item_keeps_bytes_and_notes() {
        let item = item(serde_json::json!({
            "title": "Logo",
            "description": "Brand mark",
            "notes": "for a bakery",
            "fileName": "logo.png",
            "mimeType": "image/png",
            "fileBuffer": "AQID"
        }))
        .unwrap();
        let file = item.source.file().unwrap();
        assert_eq!(file.bytes, vec![1, 2, 3]);
        assert_eq!(item.category, ContentCategory::Image);
        assert_eq!(item.notes.as_deref(), Some("for a bakery"));
    }

    #[test]
    fn test_item_without_source_is_rejected() {
        let err = item(serde_json::json!({"title": "T", "description": "D"})).unwrap_err();
        assert_eq!(err.to_string(), "item 0: url or fileName is required");
    }
}
