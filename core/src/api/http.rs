// storefront/src/api/http.rs

//! reqwest-backed `StorefrontApi`.

use crate::api::endpoints;
use crate::api::StorefrontApi;
use crate::config::ApiConfig;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::product::ProductListBody;
use crate::models::{Category, City, OrderCreated, OrderRequest, OrderResult, Product, ProductPage, ProductQuery};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
  client: Client,
  base_url: String,
  log_requests: bool,
  log_responses: bool,
}

impl HttpStorefrontApi {
  pub fn new(config: &ApiConfig) -> StorefrontResult<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      base_url: config.base_url.clone(),
      log_requests: config.log_requests,
      log_responses: config.log_responses,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> StorefrontResult<T> {
    let url = endpoints::join(&self.base_url, path);
    if self.log_requests {
      info!(target: "storefront::http", method = "GET", %url, ?query, "Request");
    }
    let response = self.client.get(&url).query(query).send().await?;
    let text = self.read_body(response).await?;
    let body = if text.trim().is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_str(&text)?
    };
    Ok(serde_json::from_value(body)?)
  }

  async fn post_json<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> StorefrontResult<serde_json::Value> {
    let url = endpoints::join(&self.base_url, path);
    if self.log_requests {
      let body = serde_json::to_string(payload).unwrap_or_default();
      info!(target: "storefront::http", method = "POST", %url, %body, "Request");
    }
    let response = self.client.post(&url).json(payload).send().await?;
    let text = self.read_body(response).await?;
    if text.trim().is_empty() {
      return Ok(serde_json::Value::Null);
    }
    match serde_json::from_str(&text) {
      Ok(body) => Ok(body),
      Err(e) => {
        warn!(error = %e, "2xx response is not JSON; keeping it as text.");
        Ok(serde_json::Value::String(text))
      }
    }
  }

  /// Returns the body text of a 2xx response, or `StorefrontError::Api` for
  /// any other status.
  async fn read_body(&self, response: Response) -> StorefrontResult<String> {
    let status = response.status();
    let text = response.text().await?;
    if self.log_responses {
      info!(target: "storefront::http", status = status.as_u16(), body = %text, "Response");
    }

    if !status.is_success() {
      let message = backend_message(&text);
      warn!(status = status.as_u16(), message = ?message, "Backend returned an error status.");
      return Err(StorefrontError::Api {
        status: status.as_u16(),
        message,
      });
    }

    Ok(text)
  }
}

/// Pulls the human-readable message out of an error body, if there is one.
pub(crate) fn backend_message(body: &str) -> Option<String> {
  let value: serde_json::Value = serde_json::from_str(body).ok()?;
  ["message", "detail"]
    .iter()
    .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
    .filter(|m| !m.trim().is_empty())
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
  #[instrument(skip(self), err)]
  async fn list_districts(&self) -> StorefrontResult<Vec<City>> {
    self.get_json(endpoints::DISTRICTS, &[]).await
  }

  #[instrument(skip(self), err)]
  async fn list_categories(&self) -> StorefrontResult<Vec<Category>> {
    self.get_json(endpoints::CATEGORIES, &[]).await
  }

  #[instrument(skip(self), err)]
  async fn list_products(&self, query: &ProductQuery) -> StorefrontResult<ProductPage> {
    let mut params = vec![("page", query.page.to_string()), ("page_size", query.page_size.to_string())];
    if let Some(category_id) = query.category_id {
      params.push(("category_id", category_id.to_string()));
    }
    let body: ProductListBody = self.get_json(endpoints::PRODUCTS, &params).await?;
    Ok(ProductPage::from_body(body, query))
  }

  #[instrument(skip(self), err)]
  async fn get_product(&self, product_id: u64) -> StorefrontResult<Product> {
    self.get_json(&endpoints::product_detail(product_id), &[]).await
  }

  #[instrument(skip(self), err)]
  async fn get_variants(&self, product_id: u64) -> StorefrontResult<Vec<Product>> {
    self.get_json(&endpoints::product_variants(product_id), &[]).await
  }

  #[instrument(skip(self, order), fields(district_id = order.district_id), err)]
  async fn create_order(&self, order: &OrderRequest) -> StorefrontResult<OrderCreated> {
    let raw = self.post_json(endpoints::ORDERS, order).await?;
    // the order exists once the backend answered 2xx, whatever the body's shape
    let result = if raw.is_null() {
      OrderResult::default()
    } else {
      serde_json::from_value::<OrderResult>(raw.clone()).unwrap_or_else(|e| {
        warn!(error = %e, "Unexpected order response shape; keeping the raw body.");
        OrderResult::default()
      })
    };
    info!(order_no = ?result.order_no, "Order created.");
    Ok(OrderCreated { result, raw })
  }
}
