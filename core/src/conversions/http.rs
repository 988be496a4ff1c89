// storefront/src/conversions/http.rs
use crate::api::endpoints;
use crate::config::ApiConfig;
use crate::conversions::{ConversionDelivery, ConversionEvent, ConversionsSink};
use crate::error::{StorefrontError, StorefrontResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Relays events through the backend's conversions endpoint, which forwards
/// them to the ad platform.
#[derive(Debug, Clone)]
pub struct HttpConversions {
  client: Client,
  url: String,
  pixel_id: String,
  access_token: String,
  test_event_code: String,
  log_traffic: bool,
}

#[derive(Serialize)]
struct Envelope<'a> {
  pixel_id: &'a str,
  access_token: &'a str,
  test_event_code: &'a str,
  event_data: &'a ConversionEvent,
}

impl HttpConversions {
  pub fn new(config: &ApiConfig) -> StorefrontResult<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      url: endpoints::join(&config.conversions_base_url, endpoints::CONVERSIONS),
      pixel_id: config.pixel_id.clone(),
      access_token: config.access_token.clone(),
      test_event_code: config.test_event_code.clone(),
      log_traffic: config.log_requests,
    })
  }
}

#[async_trait]
impl ConversionsSink for HttpConversions {
  #[instrument(skip_all, fields(event_name = ?event.event_name, event_id = %event.event_id))]
  async fn send(&self, event: &ConversionEvent) -> StorefrontResult<ConversionDelivery> {
    if self.access_token.is_empty() {
      warn!("Conversions access token not configured; skipping server-side event.");
      return Ok(ConversionDelivery::Skipped("access token not configured"));
    }

    let envelope = Envelope {
      pixel_id: &self.pixel_id,
      access_token: &self.access_token,
      test_event_code: &self.test_event_code,
      event_data: event,
    };
    if self.log_traffic {
      info!(target: "storefront::http", url = %self.url, event = ?event, "Conversion event");
    }

    let response = self.client.post(&self.url).json(&envelope).send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
      return Err(StorefrontError::Api {
        status: status.as_u16(),
        message: crate::api::http::backend_message(&text),
      });
    }

    let body: serde_json::Value = if text.trim().is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_str(&text)?
    };
    if body.get("success").and_then(|v| v.as_bool()) == Some(false) {
      let reason = body
        .get("error")
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
        .unwrap_or_else(|| "success: false".to_string());
      return Err(StorefrontError::ConversionRejected(reason));
    }

    if self.log_traffic {
      info!(target: "storefront::http", body = %body, "Conversion event accepted");
    }
    Ok(ConversionDelivery::Sent(body))
  }
}
