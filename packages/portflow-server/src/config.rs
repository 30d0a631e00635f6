use anyhow::{Context, Result};
use dotenvy::dotenv;
use portflow::PipelineConfig;
use std::env;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let pipeline = PipelineConfig::from_env().context("Invalid pipeline configuration")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            // This server is the analysis endpoint; never call back into it
            pipeline: pipeline.with_remote_enabled(false),
        })
    }
}
