//! Remote analysis service client and strategy.
//!
//! The service takes `{fileName?, fileUrl?, fileBuffer?}` and answers with a
//! title and description. `portflow-server` serves the same wire types.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{AttemptContext, Generated, GenerationStrategy};
use crate::error::{AnalysisError, StrategyError};
use crate::types::{AnalysisInput, AnalysisMethod, AnalysisResult, Capabilities, Source};

/// Request body of `POST /api/analyze-file`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Public URL of the file, or the link being analyzed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,

    /// Base64 file contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_buffer: Option<String>,
}

impl AnalyzeFileRequest {
    /// Build a request for an input. `None` when there is nothing to send.
    ///
    /// A file's public location is preferred over uploading its bytes.
    pub fn from_input(input: &AnalysisInput) -> Option<Self> {
        match input.source() {
            Source::File(file) => {
                let file_url = file
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from);
                let file_buffer = (file_url.is_none() && !file.bytes.is_empty())
                    .then(|| base64::engine::general_purpose::STANDARD.encode(&file.bytes));
                let request = Self {
                    file_name: Some(file.name.clone()),
                    file_url,
                    file_buffer,
                };
                request.has_payload().then_some(request)
            }
            Source::Url { url } => {
                let url = url.trim();
                (!url.is_empty()).then(|| Self {
                    file_name: None,
                    file_url: Some(url.to_string()),
                    file_buffer: None,
                })
            }
        }
    }

    /// Whether a URL or a buffer is present.
    pub fn has_payload(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.file_url) || present(&self.file_buffer)
    }

    /// Decoded `fileBuffer`, if any.
    pub fn decode_buffer(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.file_buffer
            .as_deref()
            .map(|b| base64::engine::general_purpose::STANDARD.decode(b.trim()))
    }
}

/// Title and description offered when analysis failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub title: String,
    pub description: String,
}

/// Response body of `POST /api/analyze-file`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFileResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

impl AnalyzeFileResponse {
    pub fn success(result: &AnalysisResult) -> Self {
        Self {
            success: true,
            title: Some(result.title.clone()),
            description: Some(result.description.clone()),
            file_type: Some(result.category.as_str().to_string()),
            extracted_text: result.extracted_preview.clone(),
            method: Some(result.method.as_str().to_string()),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>, fallback: Option<Fallback>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            fallback,
            ..Default::default()
        }
    }
}

/// HTTP client for the remote analysis endpoint.
#[derive(Debug, Clone)]
pub struct RemoteAnalysisClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a request and return the successful response.
    pub async fn analyze(
        &self,
        request: &AnalyzeFileRequest,
    ) -> Result<AnalyzeFileResponse, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::RemoteServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::RemoteServiceUnavailable(e.to_string()))?;
        let parsed = serde_json::from_str::<AnalyzeFileResponse>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(AnalysisError::RemoteServiceError {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed = parsed.map_err(|e| AnalysisError::RemoteServiceError {
            status: Some(status.as_u16()),
            message: format!("malformed payload: {e}"),
        })?;
        if !parsed.success {
            return Err(AnalysisError::RemoteServiceError {
                status: Some(status.as_u16()),
                message: parsed
                    .error
                    .unwrap_or_else(|| "analysis was not successful".to_string()),
            });
        }
        Ok(parsed)
    }
}

/// First stage of the chain: the remote analysis service.
#[derive(Debug, Clone)]
pub struct RemoteAnalysisStrategy {
    client: RemoteAnalysisClient,
}

impl RemoteAnalysisStrategy {
    pub fn new(client: RemoteAnalysisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerationStrategy for RemoteAnalysisStrategy {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::RemoteAi
    }

    fn is_available(&self, capabilities: &Capabilities) -> bool {
        capabilities.advanced_ai
    }

    async fn attempt(&self, ctx: &AttemptContext<'_>) -> Result<Generated, StrategyError> {
        let request = AnalyzeFileRequest::from_input(ctx.input).ok_or_else(|| {
            AnalysisError::RemoteServiceError {
                status: None,
                message: "input has neither a URL nor file contents".into(),
            }
        })?;
        debug!(endpoint = %self.client.endpoint(), "Calling remote analysis service");

        let response = self.client.analyze(&request).await?;
        let title = response.title.as_deref().map(str::trim).unwrap_or_default();
        let description = response
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if title.is_empty() || description.is_empty() {
            return Err(AnalysisError::RemoteServiceError {
                status: None,
                message: "empty title or description".into(),
            });
        }

        Ok(Generated::new(title, description)
            .with_preview(response.extracted_text.filter(|t| !t.trim().is_empty())))
    }
}
