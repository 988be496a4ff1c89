// storefront/src/api/endpoints.rs

pub const DISTRICTS: &str = "/api/flash-local/districts/";
pub const CATEGORIES: &str = "/api/flash-local/categories/level1/";
pub const PRODUCTS: &str = "/api/flash-local/";
pub const ORDERS: &str = "/api/flash-local/orders/";
pub const CONVERSIONS: &str = "/api/facebook-conversions";

pub fn product_detail(product_id: u64) -> String {
  format!("/api/flash-local/{}", product_id)
}

pub fn product_variants(product_id: u64) -> String {
  format!("/api/flash-local/{}/variants", product_id)
}

/// Joins a configured base URL and an endpoint path without doubling slashes.
pub fn join(base_url: &str, path: &str) -> String {
  format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
