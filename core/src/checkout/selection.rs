// storefront/src/checkout/selection.rs
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::order::OrderLineItem;
use crate::models::product::Product;

/// The product and quantity chosen on the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSelection {
  product: Product,
  quantity: u32,
}

impl ProductSelection {
  /// Starts at quantity 1. A product with no stock cannot be selected.
  pub fn new(product: Product) -> StorefrontResult<Self> {
    if product.stock == 0 {
      return Err(StorefrontError::QuantityOutOfRange { requested: 1, stock: 0 });
    }
    Ok(Self { product, quantity: 1 })
  }

  pub fn with_quantity(product: Product, quantity: u32) -> StorefrontResult<Self> {
    let mut selection = Self::new(product)?;
    selection.set_quantity(quantity)?;
    Ok(selection)
  }

  /// Refused changes leave the current quantity in place.
  pub fn set_quantity(&mut self, quantity: u32) -> StorefrontResult<()> {
    if quantity == 0 || quantity > self.product.stock {
      return Err(StorefrontError::QuantityOutOfRange {
        requested: quantity,
        stock: self.product.stock,
      });
    }
    self.quantity = quantity;
    Ok(())
  }

  pub fn increment(&mut self) -> StorefrontResult<()> {
    self.set_quantity(self.quantity.saturating_add(1))
  }

  pub fn decrement(&mut self) -> StorefrontResult<()> {
    self.set_quantity(self.quantity.saturating_sub(1))
  }

  pub fn product(&self) -> &Product {
    &self.product
  }

  pub fn quantity(&self) -> u32 {
    self.quantity
  }

  pub fn total_price(&self) -> f64 {
    self.product.price * f64::from(self.quantity)
  }

  pub fn line_item(&self) -> OrderLineItem {
    OrderLineItem {
      product_id: self.product.product_id.to_string(),
      sku_id: self.product.default_sku_id(),
      quantity: self.quantity,
      unit_price: self.product.price,
      total_price: self.total_price(),
    }
  }
}
