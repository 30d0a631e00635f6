//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use portflow::{Analyzer, PipelineConfig, PortfolioGateway};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    analyze_file_handler, fetch_portfolio_handler, health_handler, publish_portfolio_handler,
};

/// Uploaded files arrive base64-encoded inside JSON bodies
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub gateway: Arc<PortfolioGateway>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, gateway: PortfolioGateway) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            gateway: Arc::new(gateway),
        }
    }

    /// Analyzer and gateway built from one configuration.
    pub fn from_config(config: PipelineConfig) -> Self {
        let gateway = PortfolioGateway::from_config(&config);
        Self::new(Analyzer::new(config), gateway)
    }
}

/// Build the Axum application router
pub fn build_app(config: PipelineConfig) -> Router {
    build_router(AppState::from_config(config))
}

/// Router over existing state (tests inject stores and models here)
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - the analysis endpoint is called from browsers
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/analyze-file", post(analyze_file_handler))
        .route("/api/portfolios", post(publish_portfolio_handler))
        .route("/api/portfolios/:slug", get(fetch_portfolio_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
