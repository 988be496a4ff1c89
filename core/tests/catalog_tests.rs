// tests/catalog_tests.rs
mod common;

use common::*;
use std::sync::atomic::Ordering;
use storefront::checkout::{flatten_catalog, load_districts};
use storefront::models::City;
use storefront::StorefrontError;

#[test]
fn flattens_in_catalog_order_with_parent_city() {
  let districts = flatten_catalog(&abidjan_catalog()).unwrap();

  assert_eq!(districts.len(), 2);
  assert_eq!(districts[0].name, "Cocody");
  assert_eq!(districts[0].city_id, 1);
  assert_eq!(districts[0].city_name, "Abidjan");
  assert!((districts[0].latitude - 5.3599).abs() < 1e-9);
  assert!((districts[0].longitude + 3.9870).abs() < 1e-9);
  assert_eq!(districts[1].name, "Plateau");
}

#[test]
fn empty_catalog_is_not_an_error() {
  assert!(flatten_catalog(&[]).unwrap().is_empty());
}

#[test]
fn non_numeric_coordinate_rejects_the_catalog() {
  let cities: Vec<City> = serde_json::from_value(serde_json::json!([
    { "id": 1, "name": "Abidjan", "districts": [
      { "id": 7, "name": "Cocody", "latitude": "5.3599", "longitude": "-3.9870" },
      { "id": 9, "name": "Yopougon", "latitude": "n/a", "longitude": "-4.08" }
    ]}
  ]))
  .unwrap();

  let err = flatten_catalog(&cities).unwrap_err();
  assert!(matches!(err, StorefrontError::InvalidCatalog(ref msg) if msg.contains("Yopougon")));
  assert_eq!(err.user_message(), "Impossible de charger la liste des districts");
}

#[tokio::test]
async fn load_failure_can_be_retried_by_the_caller() {
  setup_tracing();
  let api = FakeApi::with_catalog(None);

  assert!(matches!(load_districts(&api).await, Err(StorefrontError::Api { status: 503, .. })));
  assert_eq!(api.district_calls.load(Ordering::SeqCst), 1);

  *api.catalog.lock() = Some(abidjan_catalog());
  let districts = load_districts(&api).await.unwrap();
  assert_eq!(districts.len(), 2);
  assert_eq!(api.district_calls.load(Ordering::SeqCst), 2);
}
