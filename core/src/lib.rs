// storefront/src/lib.rs

//! Storefront: the checkout core of a cash-on-delivery flash-sale shop.
//!
//! The crate covers the parts of the shop that carry business rules:
//!  - Loading the city/district catalog and picking a delivery pin on the map.
//!  - Validating the buyer's contact details.
//!  - Building and submitting the order, then forwarding a purchase conversion
//!    to the ad platform without blocking the buyer.
//!  - First-touch ad attribution captured from the landing URL.
//!
//! Order submission runs as a small named-step pipeline (see [`pipeline`]) over
//! a shared [`ContextData`].

pub mod api;
pub mod attribution;
pub mod checkout;
pub mod config;
pub mod conversions;
pub mod error;
pub mod models;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::api::{HttpStorefrontApi, StorefrontApi};
pub use crate::attribution::{AttributionStore, CaptureOutcome, FileStorage, MemoryStorage};
pub use crate::checkout::{
  CheckoutSession, CheckoutState, ContactForm, LocationPicker, OrderDraft, OrderSettings, OrderSubmitter,
  ProductSelection, SubmissionReceipt,
};
pub use crate::config::{ApiConfig, ApiEnvironment};
pub use crate::conversions::{ConversionStats, ConversionsSink, HttpConversions};
pub use crate::error::{StorefrontError, StorefrontResult};
pub use crate::pipeline::{ContextData, Pipeline, PipelineResult, StepControl};
