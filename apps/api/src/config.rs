use anyhow::{Context, Result};

use crate::knit_client::KNIT_APPLICATION_URL;

const DEFAULT_ATS_CONFIG_PATH: &str = "ats_config.json";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub knit_api_key: String,
    pub knit_api_url: String,
    pub ats_config_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            knit_api_key: require_env("KNIT_API_KEY")?,
            knit_api_url: std::env::var("KNIT_API_URL")
                .unwrap_or_else(|_| KNIT_APPLICATION_URL.to_string()),
            ats_config_path: std::env::var("ATS_CONFIG_PATH")
                .unwrap_or_else(|_| DEFAULT_ATS_CONFIG_PATH.to_string()),
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
