// storefront/src/models/product.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
  pub sku_id: String,
  #[serde(default)]
  pub price: Option<f64>,
  #[serde(default)]
  pub stock: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub product_id: u64,
  #[serde(default)]
  pub name_fr: String,
  #[serde(default)]
  pub name: Option<String>,
  pub price: f64,
  #[serde(default)]
  pub original_price: Option<f64>,
  /// Discount ratio, e.g. `0.35` for -35%.
  #[serde(default)]
  pub off: Option<f64>,
  #[serde(default)]
  pub stock: u32,
  #[serde(default)]
  pub image_url: Vec<String>,
  #[serde(default)]
  pub skus: Vec<Sku>,
  #[serde(default)]
  pub product_group_id: Option<u64>,
  #[serde(default)]
  pub variant_name: Option<String>,
  #[serde(default)]
  pub category_id: Option<u64>,
}

impl Product {
  /// First sku id, or the product id when the product has no skus.
  pub fn default_sku_id(&self) -> String {
    self
      .skus
      .first()
      .map(|sku| sku.sku_id.clone())
      .unwrap_or_else(|| self.product_id.to_string())
  }

  pub fn has_variants(&self) -> bool {
    self.product_group_id.is_some()
  }

  /// Discount as a whole percentage, for the "-35%" badge.
  pub fn discount_percent(&self) -> Option<u32> {
    self.off.filter(|off| *off > 0.0).map(|off| (off * 100.0).round() as u32)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
  pub category_id: Option<u64>,
  #[serde(default)]
  pub name_fr: String,
  #[serde(default)]
  pub name: Option<String>,
}

impl Category {
  /// The "Tout" tab shown before the backend categories.
  pub fn all() -> Self {
    Self {
      category_id: None,
      name_fr: "Tout".to_string(),
      name: Some("全部".to_string()),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
  pub page: u32,
  pub page_size: u32,
  pub category_id: Option<u64>,
}

impl Default for ProductQuery {
  fn default() -> Self {
    Self {
      page: 1,
      page_size: 20,
      category_id: None,
    }
  }
}

/// Listing body as returned by the backend, which has used all three shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductListBody {
  Items {
    items: Vec<Product>,
    #[serde(default)]
    total: Option<u64>,
  },
  Results {
    results: Vec<Product>,
    #[serde(default)]
    total: Option<u64>,
  },
  Bare(Vec<Product>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
  pub items: Vec<Product>,
  pub total: Option<u64>,
  pub page: u32,
  pub page_size: u32,
}

impl ProductPage {
  pub fn from_body(body: ProductListBody, query: &ProductQuery) -> Self {
    let (items, total) = match body {
      ProductListBody::Items { items, total } => (items, total),
      ProductListBody::Results { results, total } => (results, total),
      ProductListBody::Bare(items) => (items, None),
    };
    Self {
      items,
      total,
      page: query.page,
      page_size: query.page_size,
    }
  }

  /// Another page is worth requesting when this one came back full or the
  /// reported total lies beyond it.
  pub fn has_more(&self) -> bool {
    let full_page = self.items.len() as u64 >= u64::from(self.page_size) && self.page_size > 0;
    let below_total = self
      .total
      .map(|total| u64::from(self.page) * u64::from(self.page_size) < total)
      .unwrap_or(false);
    full_page || below_total
  }
}
