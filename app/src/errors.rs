// storefront_cli/src/errors.rs

use std::path::PathBuf;
use storefront::error::{StorefrontError, DISTRICTS_UNAVAILABLE_MESSAGE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Invalid environment: {0} (available: dev, prod)")]
  UnknownEnvironment(String),

  #[error("Environment file does not exist: {}", .0.display())]
  EnvFileMissing(PathBuf),

  #[error("District catalog unavailable: {0}")]
  DistrictsUnavailable(#[source] StorefrontError),

  #[error("Storefront Error: {source}")]
  Storefront {
    #[from]
    source: StorefrontError,
  },

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl AppError {
  /// What the buyer sees, as opposed to the logged error chain.
  pub fn user_message(&self) -> String {
    match self {
      AppError::Storefront { source } => source.user_message(),
      AppError::DistrictsUnavailable(_) => DISTRICTS_UNAVAILABLE_MESSAGE.to_string(),
      other => other.to_string(),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StorefrontError>() {
      Ok(source) => AppError::Storefront { source },
      Err(err) => AppError::Internal(format!("{:#}", err)),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
