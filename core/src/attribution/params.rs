// storefront/src/attribution/params.rs

//! Reading campaign parameters off a landing URL.

use crate::models::attribution::{AttributionRecord, UtmParams};
use chrono::{DateTime, Utc};

/// Query parameters of the page the visitor landed on.
#[derive(Debug, Clone, Default)]
pub struct LandingParams {
  url: String,
  pairs: Vec<(String, String)>,
}

impl LandingParams {
  /// Accepts a full URL, `?a=b&c=d`, or a bare `a=b&c=d` query string.
  pub fn parse(landing: &str) -> Self {
    let query = match url::Url::parse(landing) {
      Ok(url) => url.query().unwrap_or_default().to_string(),
      Err(_) => landing.trim_start_matches('?').to_string(),
    };
    let pairs = url::form_urlencoded::parse(query.as_bytes())
      .map(|(k, v)| (k.into_owned(), v.into_owned()))
      .collect();
    Self {
      url: landing.to_string(),
      pairs,
    }
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// First non-empty value for `name`.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.as_str())
      .filter(|v| !v.is_empty())
  }

  pub fn utm_params(&self) -> UtmParams {
    let owned = |name: &str| self.get(name).map(str::to_string);
    UtmParams {
      utm_source: owned("utm_source"),
      utm_medium: owned("utm_medium"),
      utm_campaign: owned("utm_campaign"),
      utm_content: owned("utm_content"),
      utm_term: owned("utm_term"),
      utm_id: owned("utm_id"),
      fbclid: owned("fbclid"),
    }
  }

  /// Facebook ad ids arrive as an all-digit `utm_content`.
  pub fn facebook_ad_id(&self) -> Option<String> {
    let content = self.get("utm_content")?.trim();
    (!content.is_empty() && content.chars().all(|c| c.is_ascii_digit())).then(|| content.to_string())
  }

  pub fn is_from_facebook(&self) -> bool {
    let source = self.get("utm_source");
    let medium = self.get("utm_medium");
    let paid_social = matches!(source, Some("fb") | Some("facebook")) && matches!(medium, Some("paid") | Some("cpc"));
    paid_social || self.get("fbclid").is_some()
  }

  pub fn is_from_tiktok(&self) -> bool {
    matches!(self.get("utm_source"), Some("tiktok") | Some("tt"))
  }

  /// The Facebook ad id when there is one, otherwise the `"tiktok"` tag.
  pub fn ad_source(&self) -> Option<String> {
    self
      .facebook_ad_id()
      .or_else(|| self.is_from_tiktok().then(|| "tiktok".to_string()))
  }

  pub fn tracking_record(&self, captured_at: DateTime<Utc>) -> AttributionRecord {
    AttributionRecord {
      ad_id: self.ad_source(),
      utm_params: self.utm_params(),
      is_from_facebook: self.is_from_facebook(),
      is_from_tiktok: self.is_from_tiktok(),
      captured_at,
      url: self.url.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numeric_utm_content_is_the_ad_id() {
    let p = LandingParams::parse("https://shop.example/?utm_source=fb&utm_medium=paid&utm_content=120234195461580432");
    assert_eq!(p.facebook_ad_id().as_deref(), Some("120234195461580432"));
    assert_eq!(p.ad_source().as_deref(), Some("120234195461580432"));
    assert!(p.is_from_facebook());
    assert!(!p.is_from_tiktok());
  }

  #[test]
  fn non_numeric_content_is_ignored() {
    let p = LandingParams::parse("?utm_content=summer_sale&utm_source=facebook");
    assert_eq!(p.facebook_ad_id(), None);
    assert_eq!(p.ad_source(), None);
    // facebook source without a paid medium and without fbclid
    assert!(!p.is_from_facebook());
  }

  #[test]
  fn tiktok_tag_and_fbclid() {
    let p = LandingParams::parse("utm_source=tt&fbclid=IwAR0");
    assert_eq!(p.ad_source().as_deref(), Some("tiktok"));
    assert!(p.is_from_facebook());
    assert_eq!(p.utm_params().fbclid.as_deref(), Some("IwAR0"));
  }

  #[test]
  fn empty_values_read_as_absent() {
    let p = LandingParams::parse("https://shop.example/product/194?utm_content=&fbclid=");
    assert!(p.utm_params().is_empty());
    assert!(!p.is_from_facebook());
  }
}
