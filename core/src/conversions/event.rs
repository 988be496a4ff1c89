// storefront/src/conversions/event.rs

//! Conversion events and the hashing rules the ad platform imposes on user data.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Country calling code used when normalising phone numbers for matching.
pub const CONVERSION_PHONE_PREFIX: &str = "237";
pub const CONVERSION_CURRENCY: &str = "XAF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventName {
  Purchase,
  InitiateCheckout,
  AddPaymentInfo,
}

/// Browser-side match keys. None of these are hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
  pub user_agent: Option<String>,
  pub client_ip_address: Option<String>,
  pub fbc: Option<String>,
  pub fbp: Option<String>,
}

impl ClientInfo {
  /// Records a click id as `fbc`, formatted the way the platform expects.
  pub fn with_click_id(mut self, fbclid: Option<&str>, now_ms: i64) -> Self {
    self.fbc = fbclid.filter(|id| !id.is_empty()).map(|id| format_fbc(id, now_ms));
    self
  }
}

/// `fb.1.<unix ms>.<fbclid>` unless the value is already in that form.
pub fn format_fbc(fbclid: &str, now_ms: i64) -> String {
  if fbclid.starts_with("fb.") {
    fbclid.to_string()
  } else {
    format!("fb.1.{}.{}", now_ms, fbclid)
  }
}

/// Identity fields supplied by the buyer. Everything here is hashed before it
/// leaves the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerIdentity {
  pub email: Option<String>,
  pub phone: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
}

/// Trim, lower-case, SHA-256, lowercase hex.
pub fn hash_user_field(value: &str) -> String {
  let normalized = value.trim().to_lowercase();
  hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Digits only, with a leading trunk `0` replaced by the calling code and the
/// calling code added when missing.
pub fn normalize_phone(raw: &str) -> String {
  let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
  if let Some(rest) = digits.strip_prefix('0') {
    format!("{}{}", CONVERSION_PHONE_PREFIX, rest)
  } else if digits.starts_with(CONVERSION_PHONE_PREFIX) {
    digits
  } else {
    format!("{}{}", CONVERSION_PHONE_PREFIX, digits)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub em: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ph: Option<Vec<String>>,
  #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
  pub first_name: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ln: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ct: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub country: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_user_agent: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub client_ip_address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fbc: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fbp: Option<String>,
}

impl UserData {
  pub fn build(identity: &BuyerIdentity, client: &ClientInfo) -> Self {
    let hashed = |value: &Option<String>| {
      value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| vec![hash_user_field(v)])
    };
    Self {
      em: hashed(&identity.email),
      ph: identity
        .phone
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(|p| vec![hash_user_field(&normalize_phone(p))]),
      first_name: hashed(&identity.first_name),
      ln: hashed(&identity.last_name),
      ct: hashed(&identity.city),
      country: hashed(&identity.country),
      client_user_agent: client.user_agent.clone(),
      client_ip_address: client.client_ip_address.clone(),
      fbc: client.fbc.clone(),
      fbp: client.fbp.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
  pub id: String,
  pub quantity: u32,
  pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomData {
  pub currency: String,
  pub value: f64,
  pub content_type: String,
  pub content_ids: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub contents: Option<Vec<ContentItem>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub num_items: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEvent {
  pub event_name: EventName,
  pub event_time: i64,
  pub user_data: UserData,
  pub custom_data: CustomData,
  pub event_source_url: String,
  pub action_source: String,
  /// Deduplicates this server-side event against the browser pixel.
  pub event_id: String,
}

/// The order facts an event is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFacts {
  pub product_id: u64,
  pub quantity: u32,
  pub unit_price: f64,
  pub total_price: f64,
  pub order_no: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
  pub identity: BuyerIdentity,
  pub client: ClientInfo,
  pub source_url: String,
  pub event_time: i64,
}

impl ConversionEvent {
  pub fn purchase(order: &OrderFacts, ctx: &EventContext) -> Self {
    let product_id = order.product_id.to_string();
    let event_id = match &order.order_no {
      Some(order_no) => format!("purchase_{}", order_no),
      None => format!("purchase_{}", uuid::Uuid::new_v4()),
    };
    Self::assemble(
      EventName::Purchase,
      CustomData {
        currency: CONVERSION_CURRENCY.to_string(),
        value: order.total_price,
        content_type: "product".to_string(),
        content_ids: vec![product_id.clone()],
        contents: Some(vec![ContentItem {
          id: product_id,
          quantity: order.quantity,
          price: order.unit_price,
        }]),
        num_items: Some(order.quantity),
        order_id: order.order_no.clone(),
      },
      ctx,
      event_id,
    )
  }

  pub fn initiate_checkout(order: &OrderFacts, ctx: &EventContext) -> Self {
    Self::assemble(
      EventName::InitiateCheckout,
      CustomData {
        currency: CONVERSION_CURRENCY.to_string(),
        value: order.total_price,
        content_type: "product".to_string(),
        content_ids: vec![order.product_id.to_string()],
        contents: None,
        num_items: Some(order.quantity),
        order_id: None,
      },
      ctx,
      format!("checkout_{}", uuid::Uuid::new_v4()),
    )
  }

  pub fn add_payment_info(order: &OrderFacts, ctx: &EventContext) -> Self {
    Self::assemble(
      EventName::AddPaymentInfo,
      CustomData {
        currency: CONVERSION_CURRENCY.to_string(),
        value: order.total_price,
        content_type: "product".to_string(),
        content_ids: vec![order.product_id.to_string()],
        contents: None,
        num_items: None,
        order_id: None,
      },
      ctx,
      format!("payment_info_{}", uuid::Uuid::new_v4()),
    )
  }

  fn assemble(event_name: EventName, custom_data: CustomData, ctx: &EventContext, event_id: String) -> Self {
    Self {
      event_name,
      event_time: ctx.event_time,
      user_data: UserData::build(&ctx.identity, &ctx.client),
      custom_data,
      event_source_url: ctx.source_url.clone(),
      action_source: "website".to_string(),
      event_id,
    }
  }
}
