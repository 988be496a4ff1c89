// storefront/src/error.rs
use crate::checkout::session::CheckoutState;
use crate::models::contact::ValidationErrors;
use thiserror::Error;

/// Alert text shown when the backend rejects an order without a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Une erreur est survenue";
pub const DISTRICTS_UNAVAILABLE_MESSAGE: &str = "Impossible de charger la liste des districts";
pub const PIN_REQUIRED_MESSAGE: &str = "Veuillez cliquer sur la carte pour choisir un emplacement";

#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Network error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Backend responded with status {status}: {}", message.as_deref().unwrap_or("<no message>"))]
  Api { status: u16, message: Option<String> },

  #[error("Malformed response body: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("Invalid district catalog: {0}")]
  InvalidCatalog(String),

  #[error("Contact form is invalid ({} field(s))", .0.len())]
  Validation(ValidationErrors),

  #[error("Action '{action}' is not allowed while in state {from:?}")]
  InvalidTransition { from: CheckoutState, action: &'static str },

  #[error("A delivery pin must be placed before continuing")]
  PinRequired,

  #[error("Coordinate out of range: lat {lat}, lng {lng}")]
  InvalidCoordinate { lat: f64, lng: f64 },

  #[error("Quantity {requested} outside of 1..={stock}")]
  QuantityOutOfRange { requested: u32, stock: u32 },

  #[error("Unknown district id {0}")]
  UnknownDistrict(u64),

  #[error("Order submission already in flight")]
  SubmissionInFlight,

  #[error("Conversions endpoint refused the event: {0}")]
  ConversionRejected(String),

  #[error("Attribution storage error: {0}")]
  Storage(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal storefront error: {0}")]
  Internal(String),
}

impl StorefrontError {
  /// Text for the blocking alert raised by a failed checkout action.
  pub fn user_message(&self) -> String {
    match self {
      StorefrontError::Api { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
      StorefrontError::Validation(errors) => errors
        .values()
        .next()
        .cloned()
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
      StorefrontError::InvalidCatalog(_) => DISTRICTS_UNAVAILABLE_MESSAGE.to_string(),
      StorefrontError::PinRequired => PIN_REQUIRED_MESSAGE.to_string(),
      _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
  }

  /// Whether pressing the same button again may succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      StorefrontError::Http(_) | StorefrontError::Api { .. } | StorefrontError::Decode(_)
    )
  }
}

pub type StorefrontResult<T, E = StorefrontError> = std::result::Result<T, E>;
