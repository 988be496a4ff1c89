// tests/http_api_tests.rs
mod common;

use common::*;
use serde_json::json;
use storefront::config::{ApiConfig, ApiEnvironment};
use storefront::conversions::{ConversionDelivery, ConversionsSink};
use storefront::models::ProductQuery;
use storefront::{HttpConversions, HttpStorefrontApi, StorefrontApi, StorefrontError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ApiConfig {
  let mut config = ApiConfig::for_environment(ApiEnvironment::Development);
  config.base_url = server.uri();
  config.conversions_base_url = server.uri();
  config
}

fn sample_request() -> storefront::models::OrderRequest {
  storefront::checkout::OrderDraft {
    selection: storefront::ProductSelection::new(sample_product()).unwrap(),
    district: storefront::checkout::flatten_catalog(&abidjan_catalog()).unwrap().remove(0),
    pin: storefront::models::Coordinate::new(5.36, -3.99),
    contact: valid_contact(),
    ad_id: None,
    client: Default::default(),
    source_url: String::new(),
  }
  .to_request(&Default::default())
}

async fn order_endpoint_answering(body: serde_json::Value) -> MockServer {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/flash-local/orders/"))
    .respond_with(ResponseTemplate::new(201).set_body_json(body))
    .expect(1)
    .mount(&server)
    .await;
  server
}

#[tokio::test]
async fn districts_are_fetched_from_the_catalog_endpoint() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/flash-local/districts/"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::to_value(abidjan_catalog()).unwrap()))
    .expect(1)
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let cities = api.list_districts().await.unwrap();
  assert_eq!(cities.len(), 2);
  assert_eq!(cities[0].districts[0].name, "Cocody");
}

#[tokio::test]
async fn product_listing_sends_paging_and_accepts_results_shape() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api/flash-local/"))
    .and(query_param("page", "2"))
    .and(query_param("page_size", "1"))
    .and(query_param("category_id", "12"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "results": [serde_json::to_value(sample_product()).unwrap()],
      "total": 5
    })))
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let page = api
    .list_products(&ProductQuery {
      page: 2,
      page_size: 1,
      category_id: Some(12),
    })
    .await
    .unwrap();
  assert_eq!(page.items[0].product_id, 194);
  assert_eq!(page.total, Some(5));
  assert!(page.has_more());
}

#[tokio::test]
async fn product_detail_and_variants() {
  setup_tracing();
  let server = MockServer::start().await;
  let mut variant = serde_json::to_value(sample_product()).unwrap();
  variant["product_id"] = json!(195);
  variant["variant_name"] = json!("Bleu");
  Mock::given(method("GET"))
    .and(path("/api/flash-local/194"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::to_value(sample_product()).unwrap()))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api/flash-local/194/variants"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([variant])))
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let product = api.get_product(194).await.unwrap();
  assert_eq!(product.discount_percent(), Some(33));
  let variants = api.get_variants(194).await.unwrap();
  assert_eq!(variants[0].variant_name.as_deref(), Some("Bleu"));
}

#[tokio::test]
async fn order_is_posted_and_response_kept_verbatim() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/flash-local/orders/"))
    .and(body_partial_json(json!({
      "phone": "2250712345678",
      "payment_method": "cod",
      "currency": "FCFA",
      "is_web": 1
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(order_accepted()))
    .expect(1)
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let created = api.create_order(&sample_request()).await.unwrap();
  assert_eq!(created.result.pickup_code(), "482913");
  assert_eq!(created.result.order_id.as_ref().map(ToString::to_string).as_deref(), Some("5521"));
  assert_eq!(created.raw, order_accepted());
}

#[tokio::test]
async fn numeric_order_no_and_code_are_accepted() {
  setup_tracing();
  let server = order_endpoint_answering(json!({ "order_no": 123, "verification_code": 482913 })).await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let created = api.create_order(&sample_request()).await.unwrap();
  assert_eq!(created.result.reference().as_deref(), Some("123"));
  assert_eq!(created.result.pickup_code(), "482913");
}

#[tokio::test]
async fn empty_code_shows_the_sentinel() {
  setup_tracing();
  let server = order_endpoint_answering(json!({ "order_no": "OD123", "verification_code": "" })).await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let created = api.create_order(&sample_request()).await.unwrap();
  assert_eq!(created.result.order_no.as_deref(), Some("OD123"));
  assert_eq!(created.result.pickup_code(), "000000");
}

#[tokio::test]
async fn unexpected_2xx_body_still_counts_as_created() {
  setup_tracing();
  let body = json!({ "order_id": [5521], "verification_code": "482913" });
  let server = order_endpoint_answering(body.clone()).await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let created = api.create_order(&sample_request()).await.unwrap();
  assert_eq!(created.result.pickup_code(), "000000");
  assert_eq!(created.raw, body);
}

#[tokio::test]
async fn plain_text_2xx_is_kept_as_the_raw_body() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/flash-local/orders/"))
    .respond_with(ResponseTemplate::new(200).set_body_string("commande enregistrée"))
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let created = api.create_order(&sample_request()).await.unwrap();
  assert_eq!(created.raw, json!("commande enregistrée"));
  assert_eq!(created.result.pickup_code(), "000000");
}

#[tokio::test]
async fn non_2xx_surfaces_backend_message() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/flash-local/orders/"))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "Stock insuffisant" })))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api/flash-local/districts/"))
    .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
    .mount(&server)
    .await;

  let api = HttpStorefrontApi::new(&config_for(&server)).unwrap();
  let request = storefront::checkout::OrderDraft {
    selection: storefront::ProductSelection::new(sample_product()).unwrap(),
    district: storefront::checkout::flatten_catalog(&abidjan_catalog()).unwrap().remove(0),
    pin: storefront::models::Coordinate::new(5.36, -3.99),
    contact: valid_contact(),
    ad_id: None,
    client: Default::default(),
    source_url: String::new(),
  }
  .to_request(&Default::default());

  let err = api.create_order(&request).await.unwrap_err();
  assert!(matches!(err, StorefrontError::Api { status: 400, .. }));
  assert_eq!(err.user_message(), "Stock insuffisant");

  let err = api.list_districts().await.unwrap_err();
  assert!(matches!(err, StorefrontError::Api { status: 502, message: None }));
  assert_eq!(err.user_message(), "Une erreur est survenue");
}

#[tokio::test]
async fn conversions_skip_without_token() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/facebook-conversions"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
    .expect(0)
    .mount(&server)
    .await;

  let sink = HttpConversions::new(&config_for(&server)).unwrap();
  let outcome = sink.send(&sample_event()).await.unwrap();
  assert!(matches!(outcome, ConversionDelivery::Skipped(_)));
}

#[tokio::test]
async fn conversions_envelope_and_success_flag() {
  setup_tracing();
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/api/facebook-conversions"))
    .and(body_partial_json(json!({
      "pixel_id": "793391936977534",
      "access_token": "tok",
      "event_data": { "event_name": "Purchase", "event_id": "purchase_FL1" }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false, "error": "invalid token" })))
    .mount(&server)
    .await;

  let mut config = config_for(&server);
  config.access_token = "tok".to_string();
  let sink = HttpConversions::new(&config).unwrap();
  let err = sink.send(&sample_event()).await.unwrap_err();
  assert!(matches!(err, StorefrontError::ConversionRejected(ref reason) if reason == "invalid token"));
}

fn sample_event() -> storefront::conversions::ConversionEvent {
  use storefront::conversions::{BuyerIdentity, ClientInfo, ConversionEvent, EventContext, OrderFacts};
  ConversionEvent::purchase(
    &OrderFacts {
      product_id: 194,
      quantity: 1,
      unit_price: 5000.0,
      total_price: 5000.0,
      order_no: Some("FL1".to_string()),
    },
    &EventContext {
      identity: BuyerIdentity::default(),
      client: ClientInfo::default(),
      source_url: "https://shop.example/".to_string(),
      event_time: 1_760_000_000,
    },
  )
}
