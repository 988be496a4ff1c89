// storefront/src/models/order.rs
use crate::models::contact::ContactInfo;
use crate::models::district::District;
use crate::models::product::Product;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Shown when the backend response carries no verification code.
pub const PICKUP_CODE_SENTINEL: &str = "000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
  #[serde(rename = "cod")]
  CashOnDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
  pub product_id: String,
  pub sku_id: String,
  pub quantity: u32,
  pub unit_price: f64,
  pub total_price: f64,
}

/// Body of `POST /api/flash-local/orders/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
  pub items: Vec<OrderLineItem>,
  pub district_id: u64,
  pub full_name: String,
  pub phone: String,
  pub whatsapp: String,
  pub receiver_address: String,
  pub latitude: f64,
  pub longitude: f64,
  pub payment_method: PaymentMethod,
  pub total_amount: f64,
  pub actual_amount: f64,
  pub discount_amount: f64,
  pub currency: String,
  pub is_web: u8,
  pub ad_id: Option<String>,
}

/// Identifier the backend sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
  Number(u64),
  Text(String),
}

impl fmt::Display for WireId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WireId::Number(n) => write!(f, "{}", n),
      WireId::Text(s) => f.write_str(s),
    }
  }
}

/// Accepts a string or a number and keeps its text. Any other JSON value reads
/// as absent.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(deserializer)? {
    Some(Value::String(text)) => Some(text),
    Some(Value::Number(number)) => Some(number.to_string()),
    _ => None,
  })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
  #[serde(default, deserialize_with = "text_or_number")]
  pub order_no: Option<String>,
  #[serde(default)]
  pub order_id: Option<WireId>,
  #[serde(default, deserialize_with = "text_or_number")]
  pub verification_code: Option<String>,
  #[serde(default)]
  pub user_id: Option<WireId>,
}

impl OrderResult {
  /// The verification code, or the sentinel when it is missing or blank.
  pub fn pickup_code(&self) -> &str {
    self
      .verification_code
      .as_deref()
      .filter(|code| !code.trim().is_empty())
      .unwrap_or(PICKUP_CODE_SENTINEL)
  }

  /// Order number for display and dedup keys, falling back to the order id.
  pub fn reference(&self) -> Option<String> {
    self
      .order_no
      .clone()
      .filter(|no| !no.trim().is_empty())
      .or_else(|| self.order_id.as_ref().map(ToString::to_string))
  }
}

/// What `create_order` hands back: the parsed fields plus the untouched body.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreated {
  pub result: OrderResult,
  pub raw: serde_json::Value,
}

/// Everything the confirmation view needs, returned once per successful order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
  pub product: Product,
  pub quantity: u32,
  pub contact: ContactInfo,
  pub district: District,
  pub total_price: f64,
  pub order: OrderResult,
  pub raw_response: serde_json::Value,
}

impl Confirmation {
  pub fn pickup_code(&self) -> &str {
    self.order.pickup_code()
  }
}
