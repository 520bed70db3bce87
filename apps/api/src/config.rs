use anyhow::{Context, Result};

pub const DEFAULT_REPORT_TITLE: &str = "조선업_AI_리포트";
pub const DEFAULT_CLUSTERS_PER_CATEGORY: usize = 3;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_api_url: String,
    pub upstream_api_token: Option<String>,
    pub render_service_url: String,
    pub report_title: String,
    pub clusters_per_category: usize,
    /// `None` keeps every item of a cluster.
    pub max_items_per_cluster: Option<usize>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upstream_api_url: require_env("UPSTREAM_API_URL")?,
            upstream_api_token: std::env::var("UPSTREAM_API_TOKEN").ok(),
            render_service_url: require_env("RENDER_SERVICE_URL")?,
            report_title: std::env::var("REPORT_TITLE")
                .unwrap_or_else(|_| DEFAULT_REPORT_TITLE.to_string()),
            clusters_per_category: match std::env::var("CLUSTERS_PER_CATEGORY") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("CLUSTERS_PER_CATEGORY must be a non-negative integer")?,
                Err(_) => DEFAULT_CLUSTERS_PER_CATEGORY,
            },
            max_items_per_cluster: std::env::var("MAX_ITEMS_PER_CLUSTER")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_ITEMS_PER_CLUSTER must be a non-negative integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
