// storefront/src/models/attribution.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Campaign parameters read off the landing URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
  pub utm_source: Option<String>,
  pub utm_medium: Option<String>,
  pub utm_campaign: Option<String>,
  pub utm_content: Option<String>,
  pub utm_term: Option<String>,
  pub utm_id: Option<String>,
  pub fbclid: Option<String>,
}

impl UtmParams {
  pub fn is_empty(&self) -> bool {
    *self == UtmParams::default()
  }
}

/// First-touch ad provenance, persisted until explicitly cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
  /// Numeric Facebook ad id, or a platform tag such as `"tiktok"`.
  pub ad_id: Option<String>,
  pub utm_params: UtmParams,
  pub is_from_facebook: bool,
  pub is_from_tiktok: bool,
  pub captured_at: DateTime<Utc>,
  pub url: String,
}
