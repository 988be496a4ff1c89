// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storefront::checkout::{CheckoutSession, ProductSelection};
use storefront::conversions::{ConversionDelivery, ConversionEvent, ConversionsSink};
use storefront::models::{
  Category, City, ContactInfo, OrderCreated, OrderRequest, OrderResult, Product, ProductPage, ProductQuery,
};
use storefront::{StorefrontApi, StorefrontError, StorefrontResult};
use tracing::Level;

// --- Fixtures ---

/// Abidjan with Cocody (coordinates as strings, the way the backend sometimes
/// sends them) and Plateau (plain numbers).
pub fn abidjan_catalog() -> Vec<City> {
  serde_json::from_value(serde_json::json!([
    {
      "id": 1,
      "name": "Abidjan",
      "districts": [
        { "id": 7, "name": "Cocody", "latitude": "5.3599", "longitude": "-3.9870" },
        { "id": 8, "name": "Plateau", "latitude": 5.3235, "longitude": -4.0197 }
      ]
    },
    { "id": 2, "name": "Bouaké", "districts": [] }
  ]))
  .expect("catalog fixture")
}

pub fn sample_product() -> Product {
  serde_json::from_value(serde_json::json!({
    "product_id": 194,
    "name_fr": "Ventilateur rechargeable",
    "price": 5000.0,
    "original_price": 7500.0,
    "off": 0.33,
    "stock": 3,
    "image_url": ["https://cdn.example/194.jpg"],
    "skus": [{ "sku_id": "SKU-194-A" }]
  }))
  .expect("product fixture")
}

pub fn product_without_skus() -> Product {
  Product {
    skus: Vec::new(),
    ..sample_product()
  }
}

pub fn valid_contact() -> ContactInfo {
  ContactInfo {
    full_name: "Awa Konan".to_string(),
    phone: "0712345678".to_string(),
    whatsapp: "0598765432".to_string(),
    address_description: "Près de la pharmacie Saint Jean".to_string(),
  }
}

pub fn order_accepted() -> serde_json::Value {
  serde_json::json!({
    "order_no": "FL20250611001",
    "order_id": 5521,
    "verification_code": "482913",
    "user_id": "u-77"
  })
}

// --- Fake backend ---

pub enum OrderOutcome {
  Created(serde_json::Value),
  Rejected { status: u16, message: Option<String> },
}

pub struct FakeApi {
  pub catalog: Mutex<Option<Vec<City>>>,
  pub products: Mutex<Vec<Product>>,
  pub order_outcome: Mutex<OrderOutcome>,
  pub orders: Mutex<Vec<OrderRequest>>,
  pub order_delay: Mutex<Duration>,
  pub district_calls: AtomicUsize,
}

impl FakeApi {
  pub fn new() -> Self {
    Self {
      catalog: Mutex::new(Some(abidjan_catalog())),
      products: Mutex::new(vec![sample_product()]),
      order_outcome: Mutex::new(OrderOutcome::Created(order_accepted())),
      orders: Mutex::new(Vec::new()),
      order_delay: Mutex::new(Duration::ZERO),
      district_calls: AtomicUsize::new(0),
    }
  }

  pub fn rejecting(status: u16, message: Option<&str>) -> Self {
    let api = Self::new();
    *api.order_outcome.lock() = OrderOutcome::Rejected {
      status,
      message: message.map(str::to_string),
    };
    api
  }

  pub fn with_catalog(catalog: Option<Vec<City>>) -> Self {
    let api = Self::new();
    *api.catalog.lock() = catalog;
    api
  }

  pub fn set_order_delay(&self, delay: Duration) {
    *self.order_delay.lock() = delay;
  }

  pub fn recorded_orders(&self) -> Vec<OrderRequest> {
    self.orders.lock().clone()
  }
}

#[async_trait]
impl StorefrontApi for FakeApi {
  async fn list_districts(&self) -> StorefrontResult<Vec<City>> {
    self.district_calls.fetch_add(1, Ordering::SeqCst);
    self.catalog.lock().clone().ok_or(StorefrontError::Api {
      status: 503,
      message: None,
    })
  }

  async fn list_categories(&self) -> StorefrontResult<Vec<Category>> {
    Ok(Vec::new())
  }

  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<ProductPage> {
    Ok(ProductPage {
      items: self.products.lock().clone(),
      total: None,
      page: query.page,
      page_size: query.page_size,
    })
  }

  async fn get_product(&self, product_id: u64) -> StorefrontResult<Product> {
    self
      .products
      .lock()
      .iter()
      .find(|p| p.product_id == product_id)
      .cloned()
      .ok_or(StorefrontError::Api {
        status: 404,
        message: Some("Produit introuvable".to_string()),
      })
  }

  async fn get_variants(&self, _product_id: u64) -> StorefrontResult<Vec<Product>> {
    Ok(Vec::new())
  }

  async fn create_order(&self, order: &OrderRequest) -> StorefrontResult<OrderCreated> {
    let delay = *self.order_delay.lock();
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    self.orders.lock().push(order.clone());
    match &*self.order_outcome.lock() {
      OrderOutcome::Created(raw) => {
        let result = if raw.is_null() {
          OrderResult::default()
        } else {
          serde_json::from_value(raw.clone())?
        };
        Ok(OrderCreated {
          result,
          raw: raw.clone(),
        })
      }
      OrderOutcome::Rejected { status, message } => Err(StorefrontError::Api {
        status: *status,
        message: message.clone(),
      }),
    }
  }
}

// --- Fake conversions sink ---

pub struct FakeConversions {
  pub events: Mutex<Vec<ConversionEvent>>,
  pub delay: Duration,
  pub fail: bool,
}

impl FakeConversions {
  pub fn ok() -> Self {
    Self {
      events: Mutex::new(Vec::new()),
      delay: Duration::ZERO,
      fail: false,
    }
  }

  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Self::ok()
    }
  }

  pub fn slow(delay: Duration) -> Self {
    Self { delay, ..Self::ok() }
  }

  pub fn sent(&self) -> Vec<ConversionEvent> {
    self.events.lock().clone()
  }
}

#[async_trait]
impl ConversionsSink for FakeConversions {
  async fn send(&self, event: &ConversionEvent) -> StorefrontResult<ConversionDelivery> {
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    self.events.lock().push(event.clone());
    if self.fail {
      return Err(StorefrontError::ConversionRejected("pixel disabled".to_string()));
    }
    Ok(ConversionDelivery::Sent(serde_json::json!({ "success": true })))
  }
}

// --- Geolocation that never answers in time ---

pub struct HangingGeolocator;

#[async_trait]
impl storefront::checkout::Geolocator for HangingGeolocator {
  async fn current_position(&self) -> anyhow::Result<storefront::models::Coordinate> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    anyhow::bail!("never reached")
  }
}

/// Counts how often a position was requested.
pub struct CountingGeolocator {
  pub calls: AtomicUsize,
  pub position: Option<storefront::models::Coordinate>,
}

#[async_trait]
impl storefront::checkout::Geolocator for CountingGeolocator {
  async fn current_position(&self) -> anyhow::Result<storefront::models::Coordinate> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.position.ok_or_else(|| anyhow::anyhow!("permission denied"))
  }
}

pub fn new_session() -> CheckoutSession {
  let selection = ProductSelection::with_quantity(sample_product(), 2).expect("selection fixture");
  CheckoutSession::with_geolocation_timeout(selection, Duration::from_millis(50))
}

pub fn shared<T>(value: T) -> Arc<T> {
  Arc::new(value)
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
