// storefront/src/models/mod.rs

//! Wire and domain types shared by the checkout flow and the HTTP clients.

pub mod attribution;
pub mod contact;
pub mod district;
pub mod order;
pub mod product;

pub use attribution::{AttributionRecord, UtmParams};
pub use contact::{ContactField, ContactInfo, ValidationErrors};
pub use district::{City, Coordinate, District, MapView};
pub use order::{Confirmation, OrderCreated, OrderLineItem, OrderRequest, OrderResult, PaymentMethod};
pub use product::{Category, Product, ProductPage, ProductQuery, Sku};
