// storefront/src/api/mod.rs

//! The remote storefront backend: catalog, products and order creation.

use crate::error::StorefrontResult;
use crate::models::{Category, City, OrderCreated, OrderRequest, Product, ProductPage, ProductQuery};
use async_trait::async_trait;

pub mod endpoints;
pub mod http;

pub use http::HttpStorefrontApi;

/// Operations the storefront needs from the backend. The checkout flow only
/// depends on this trait, so tests and alternate transports can stand in for
/// the HTTP client.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
  async fn list_districts(&self) -> StorefrontResult<Vec<City>>;

  async fn list_categories(&self) -> StorefrontResult<Vec<Category>>;

  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<ProductPage>;

  async fn get_product(&self, product_id: u64) -> StorefrontResult<Product>;

  async fn get_variants(&self, product_id: u64) -> StorefrontResult<Vec<Product>>;

  /// Non-2xx responses surface as `StorefrontError::Api` with the backend's
  /// `message` when it sent one.
  async fn create_order(&self, order: &OrderRequest) -> StorefrontResult<OrderCreated>;
}
