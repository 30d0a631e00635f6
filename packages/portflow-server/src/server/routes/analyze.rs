use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use portflow::{AnalysisInput, AnalyzeFileRequest, AnalyzeFileResponse};
use tracing::info;

use crate::server::app::AppState;
use crate::server::routes::ApiError;

/// Name given to uploads that arrive without one
const UNNAMED_UPLOAD: &str = "upload";

/// `POST /api/analyze-file`
///
/// Takes a file buffer, a file URL or a link and answers with a title and
/// description. Analysis itself never fails; only malformed requests do.
pub async fn analyze_file_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<AnalyzeFileRequest>, JsonRejection>,
) -> Result<Json<AnalyzeFileResponse>, ApiError> {
    let Json(request) = body?;
    let input = input_from_request(&request)?;
    let result = state.analyzer.analyze(&input).await;
    info!(
        input = %input.label(),
        category = %result.category,
        method = %result.method,
        "Analyzed file"
    );
    Ok(Json(AnalyzeFileResponse::success(&result)))
}

/// Turn a request body into a pipeline input.
///
/// A named request is a file (bytes and/or public URL); an unnamed URL is a
/// link.
pub fn input_from_request(request: &AnalyzeFileRequest) -> Result<AnalysisInput, ApiError> {
    if !request.has_payload() {
        return Err(ApiError::BadRequest(
            "fileUrl or fileBuffer is required".to_string(),
        ));
    }

    let bytes = request
        .decode_buffer()
        .transpose()
        .map_err(|e| ApiError::AnalysisFailed(format!("invalid fileBuffer: {e}")))?;
    let name = request
        .file_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let url = request
        .file_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let input = match (name, bytes, url) {
        (None, None, Some(url)) => AnalysisInput::url(url),
        (name, bytes, url) => {
            let input =
                AnalysisInput::file(name.unwrap_or(UNNAMED_UPLOAD), bytes.unwrap_or_default());
            match url {
                Some(url) => input.with_location(url),
                None => input,
            }
        }
    };
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portflow::Source;

    fn request(name: Option<&str>, url: Option<&str>, buffer: Option<&str>) -> AnalyzeFileRequest {
        AnalyzeFileRequest {
            file_name: name.map(String::from),
            file_url: url.map(String::from),
            file_buffer: buffer.map(String::from),
        }
    }

    #[test]
    fn test_unnamed_url_is_a_link() {
        let input = input_from_request(&request(None, Some("https://github.com/acme/widget"), None)).unwrap();
        assert!(matches!(input.source(), Source::Url { .. }));
    }

    #[test]
    fn test_named_url_is_a_hosted_file() {
        let input = input_from_request(&request(
            Some("deck.pdf"),
            Some("https://cdn.example.com/deck.pdf"),
            None,
        ))
        .unwrap();
        let file = input.as_file().unwrap();
        assert_eq!(file.name, "deck.pdf");
        assert_eq!(file.location.as_deref(), Some("https://cdn.example.com/deck.pdf"));
    }

    #[test]
    fn test_buffer_is_decoded() {
        let input = input_from_request(&request(Some("a.png"), None, Some("AQID"))).unwrap();
        assert_eq!(input.as_file().unwrap().bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_missing_payload_and_bad_base64() {
        assert!(matches!(
            input_from_request(&request(Some("a.pdf"), None, None)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            input_from_request(&request(Some("a.pdf"), None, Some("not base64!"))),
            Err(ApiError::AnalysisFailed(_))
        ));
    }
}
