// storefront/src/config.rs

use crate::error::{StorefrontError, StorefrontResult};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEV_BASE_URL: &str = "https://api.brainnel.com/test";
pub const PROD_BASE_URL: &str = "https://api.brainnel.com/backend";
pub const DEFAULT_CONVERSIONS_URL: &str = "http://ec2-13-245-80-24.af-south-1.compute.amazonaws.com:8000";
pub const DEFAULT_PIXEL_ID: &str = "793391936977534";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiEnvironment {
  #[default]
  Development,
  Production,
}

impl ApiEnvironment {
  pub fn as_str(&self) -> &'static str {
    match self {
      ApiEnvironment::Development => "development",
      ApiEnvironment::Production => "production",
    }
  }

  pub fn default_base_url(&self) -> &'static str {
    match self {
      ApiEnvironment::Development => DEV_BASE_URL,
      ApiEnvironment::Production => PROD_BASE_URL,
    }
  }

  /// Request/response logging is only ever on in development, and only when
  /// `ENABLE_CONSOLE_LOGS=true`.
  fn logs_traffic(&self) -> bool {
    matches!(self, ApiEnvironment::Development)
  }
}

impl FromStr for ApiEnvironment {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "development" | "dev" => Ok(ApiEnvironment::Development),
      "production" | "prod" => Ok(ApiEnvironment::Production),
      other => Err(StorefrontError::Config(format!("Unknown API_ENV '{}'", other))),
    }
  }
}

impl fmt::Display for ApiEnvironment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub environment: ApiEnvironment,
  pub base_url: String,
  pub timeout: Duration,
  pub log_requests: bool,
  pub log_responses: bool,

  pub conversions_base_url: String,
  pub pixel_id: String,
  pub access_token: String,
  pub test_event_code: String,
}

impl ApiConfig {
  /// Defaults for `environment` with no overrides applied.
  pub fn for_environment(environment: ApiEnvironment) -> Self {
    Self {
      environment,
      base_url: environment.default_base_url().to_string(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      log_requests: false,
      log_responses: false,
      conversions_base_url: DEFAULT_CONVERSIONS_URL.to_string(),
      pixel_id: DEFAULT_PIXEL_ID.to_string(),
      access_token: String::new(),
      test_event_code: String::new(),
    }
  }

  pub fn from_env() -> StorefrontResult<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the configuration from any key lookup, so callers (and tests) can
  /// feed values without touching the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StorefrontResult<Self> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let environment = match get("API_ENV") {
      Some(raw) => raw.parse::<ApiEnvironment>()?,
      None => ApiEnvironment::default(),
    };
    let mut config = Self::for_environment(environment);

    if let Some(base_url) = get("API_BASE_URL") {
      url::Url::parse(&base_url).map_err(|e| StorefrontError::Config(format!("Invalid API_BASE_URL: {}", e)))?;
      config.base_url = base_url;
    }
    if let Some(timeout) = get("API_TIMEOUT_SECS") {
      let secs = timeout
        .parse::<u64>()
        .map_err(|e| StorefrontError::Config(format!("Invalid API_TIMEOUT_SECS: {}", e)))?;
      config.timeout = Duration::from_secs(secs);
    }

    let console_logs = get("ENABLE_CONSOLE_LOGS").map(|v| v == "true").unwrap_or(false);
    config.log_requests = console_logs && environment.logs_traffic();
    config.log_responses = console_logs && environment.logs_traffic();

    if let Some(url) = get("FACEBOOK_API_URL") {
      config.conversions_base_url = url;
    }
    if let Some(pixel_id) = get("FACEBOOK_PIXEL_ID") {
      config.pixel_id = pixel_id;
    }
    config.access_token = get("FACEBOOK_ACCESS_TOKEN").unwrap_or_default();
    config.test_event_code = get("FACEBOOK_TEST_EVENT_CODE").unwrap_or_default();

    tracing::info!(
      environment = %config.environment,
      base_url = %config.base_url,
      log_requests = config.log_requests,
      log_responses = config.log_responses,
      "API configuration loaded."
    );
    Ok(config)
  }
}
