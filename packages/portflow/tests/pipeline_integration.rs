//! Integration tests for the analysis pipeline.
//!
//! These drive [`Analyzer`] end to end:
//! 1. Detect the category
//! 2. Extract content (filename vocabularies, fetched pages)
//! 3. Run the strategy chain (remote service, model, heuristic)

use std::sync::Arc;

use mockito::{Matcher, Server};
use portflow::{
    detect, AnalysisError, AnalysisInput, AnalysisMethod, Analyzer, ContentCategory, MockModel,
    PipelineConfig,
};
use proptest::prelude::*;

fn offline_config() -> PipelineConfig {
    PipelineConfig::default().with_fetch_urls(false)
}

fn remote_config(endpoint: &str) -> PipelineConfig {
    offline_config()
        .with_remote_endpoint(endpoint)
        .with_model_credential("sk-test")
        .with_allow_local_remote(true)
}

/// Analyzer whose model always fails, so only the remote service and the
/// heuristic can answer.
fn remote_only(config: PipelineConfig) -> Analyzer {
    let model = MockModel::new().with_error(AnalysisError::RemoteServiceUnavailable(
        "offline".into(),
    ));
    Analyzer::builder(config).with_model(Arc::new(model)).build()
}

#[test]
fn test_detection_is_deterministic() {
    assert_eq!(detect(&AnalysisInput::file("a.pdf", Vec::new())), ContentCategory::Pdf);
    assert_eq!(
        detect(&AnalysisInput::url("https://github.com/x/y")),
        ContentCategory::Github
    );
    assert_eq!(
        detect(&AnalysisInput::url("https://example.com")),
        ContentCategory::GenericLink
    );
}

#[tokio::test]
async fn test_pdf_without_text_uses_filename() {
    let analyzer = Analyzer::new(offline_config());
    let result = analyzer
        .analyze(&AnalysisInput::file("UX_Research_Notes.pdf", Vec::new()))
        .await;

    assert_eq!(result.category, ContentCategory::Pdf);
    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert!(result.title.contains("Ux Research Notes"));

    let description = result.description.to_lowercase();
    assert!(description.contains("document"));
    for kind in ["resume", "proposal", "report"] {
        assert!(!description.contains(kind), "unexpected {kind}: {description}");
    }
}

#[tokio::test]
async fn test_github_link_without_fetch() {
    let analyzer = Analyzer::new(offline_config());
    let result = analyzer
        .analyze(&AnalysisInput::url("https://github.com/acme/widget"))
        .await;

    assert_eq!(result.category, ContentCategory::Github);
    assert_eq!(result.title, "Widget");
    assert!(result.description.contains("GitHub"));
    assert!(result.description.contains("acme"));
}

#[tokio::test]
async fn test_model_line_answer_is_parsed() {
    let model = Arc::new(MockModel::new().with_response("Title: Foo\nA nice app."));
    let analyzer = Analyzer::builder(offline_config().with_model_credential("sk-test"))
        .with_model(model.clone())
        .build();

    let result = analyzer.analyze(&AnalysisInput::url("https://example.com")).await;
    assert_eq!(result.method, AnalysisMethod::LocalAi);
    assert_eq!(result.title, "Foo");
    assert_eq!(result.description, "A nice app.");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_unusable_model_answer_falls_back_to_heuristic() {
    let model = Arc::new(MockModel::new().with_response("Sorry"));
    let analyzer = Analyzer::builder(offline_config().with_model_credential("sk-test"))
        .with_model(model)
        .build();

    let result = analyzer
        .analyze(&AnalysisInput::url("https://github.com/acme/widget"))
        .await;
    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert_eq!(result.title, "Widget");
}

#[tokio::test]
async fn test_remote_service_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/analyze-file")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "fileUrl": "https://github.com/acme/widget"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "success": true,
                "title": "Widget Toolkit",
                "description": "A toolkit for widgets.",
                "fileType": "github",
                "extractedText": "README...",
                "method": "remoteAI"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let endpoint = format!("{}/api/analyze-file", server.url());
    let analyzer = remote_only(remote_config(&endpoint));
    let result = analyzer
        .analyze(&AnalysisInput::url("https://github.com/acme/widget").with_notes("side project"))
        .await;

    mock.assert_async().await;
    assert_eq!(result.method, AnalysisMethod::RemoteAi);
    assert_eq!(result.title, "Widget Toolkit");
    assert_eq!(
        result.description,
        "A toolkit for widgets. Additional context: side project"
    );
    assert_eq!(result.extracted_preview.as_deref(), Some("README..."));
}

#[tokio::test]
async fn test_remote_failure_then_model() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/analyze-file")
        .with_status(500)
        .with_body(r#"{"success": false, "error": "boom"}"#)
        .create_async()
        .await;

    let model = Arc::new(
        MockModel::new().with_response(r#"{"title": "Acme Site", "description": "Company site."}"#),
    );
    let endpoint = format!("{}/api/analyze-file", server.url());
    let analyzer = Analyzer::builder(remote_config(&endpoint))
        .with_model(model)
        .build();

    let result = analyzer.analyze(&AnalysisInput::url("https://example.com")).await;
    assert_eq!(result.method, AnalysisMethod::LocalAi);
    assert_eq!(result.title, "Acme Site");
}

#[tokio::test]
async fn test_remote_success_false_uses_heuristic() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/analyze-file")
        .with_status(200)
        .with_body(r#"{"success": false, "error": "could not analyze"}"#)
        .create_async()
        .await;

    let endpoint = format!("{}/api/analyze-file", server.url());
    let analyzer = remote_only(remote_config(&endpoint));
    let result = analyzer
        .analyze(&AnalysisInput::file("logo.png", vec![0x89, 0x50, 0x4e, 0x47]))
        .await;
    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert_eq!(result.title, "Logo");
}

#[tokio::test]
async fn test_local_preview_endpoint_is_never_called() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/analyze-file")
        .expect(0)
        .create_async()
        .await;

    let endpoint = format!("{}/api/analyze-file", server.url());
    let config = remote_config(&endpoint).with_allow_local_remote(false);
    let analyzer = remote_only(config);
    assert!(!analyzer.capabilities().advanced_ai);

    let result = analyzer
        .analyze(&AnalysisInput::url("https://dribbble.com/shots/1"))
        .await;
    mock.assert_async().await;
    assert_ne!(result.method, AnalysisMethod::RemoteAi);
    assert_eq!(result.category, ContentCategory::Dribbble);
}

#[tokio::test]
async fn test_unreachable_remote_service() {
    // Nothing listens on the discard port
    let analyzer = remote_only(remote_config("http://127.0.0.1:9/api/analyze-file"));
    assert!(analyzer.capabilities().advanced_ai);

    let result = analyzer
        .analyze(
            &AnalysisInput::file("Quarterly_Report.pdf", Vec::new())
                .with_location("https://cdn.example.com/q.pdf"),
        )
        .await;
    assert_eq!(result.method, AnalysisMethod::Heuristic);
    assert_eq!(result.title, "Quarterly Report");
}

#[tokio::test]
async fn test_fetched_page_metadata() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/work")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            r#"<html><head><title>Studio North &amp; Co</title>
            <meta name="description" content="Independent design studio building brands for climate startups.">
            </head><body><script>var x = 1;</script><p>Hello</p></body></html>"#,
        )
        .create_async()
        .await;

    let config = PipelineConfig::default().with_allow_private_hosts(true);
    let analyzer = Analyzer::new(config);
    let result = analyzer
        .analyze(&AnalysisInput::url(format!("{}/work", server.url())))
        .await;

    assert_eq!(result.category, ContentCategory::GenericLink);
    assert_eq!(result.title, "Studio North & Co");
    assert_eq!(
        result.description,
        "Independent design studio building brands for climate startups."
    );
}

#[tokio::test]
async fn test_private_hosts_are_not_fetched_by_default() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/work").expect(0).create_async().await;

    let analyzer = Analyzer::new(PipelineConfig::default());
    let result = analyzer
        .analyze(&AnalysisInput::url(format!("{}/work", server.url())))
        .await;
    mock.assert_async().await;
    assert_eq!(result.title, "Work");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_analysis_is_always_complete(
        name in "[A-Za-z0-9 _.-]{0,30}",
        ext in prop::sample::select(vec!["pdf", "png", "svg", "txt", ""]),
        notes in prop::option::of("[a-z ]{0,20}"),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let analyzer = Analyzer::new(offline_config());
        let mut input = AnalysisInput::file(format!("{name}.{ext}"), Vec::new());
        if let Some(notes) = notes {
            input = input.with_notes(notes);
        }

        let result = runtime.block_on(analyzer.analyze(&input));
        prop_assert!(!result.title.trim().is_empty());
        prop_assert!(!result.description.trim().is_empty());
        prop_assert_ne!(result.method, AnalysisMethod::RemoteAi);
    }
}
