// storefront_cli/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use storefront::ApiConfig;

pub const DEFAULT_ATTRIBUTION_STORE: &str = ".storefront/attribution.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub api: ApiConfig,
  /// Where first-touch attribution is kept between runs.
  pub attribution_store: PathBuf,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let api = ApiConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
    let attribution_store = env::var("ATTRIBUTION_STORE")
      .ok()
      .filter(|v| !v.trim().is_empty())
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_ATTRIBUTION_STORE));

    if api.access_token.is_empty() {
      tracing::warn!("FACEBOOK_ACCESS_TOKEN is not set; purchase conversions will be skipped.");
    }
    tracing::info!(attribution_store = %attribution_store.display(), "Application configuration loaded successfully.");

    Ok(Self { api, attribution_store })
  }
}
