// storefront_cli/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use std::sync::Arc;
use storefront::{
  AttributionStore, ConversionsSink, FileStorage, HttpConversions, HttpStorefrontApi, OrderSubmitter, StorefrontApi,
};

/// Everything a command needs, built once from the configuration.
#[derive(Clone)]
pub struct AppState {
  pub api: Arc<dyn StorefrontApi>,
  pub conversions: Arc<dyn ConversionsSink>,
  pub attribution: Arc<AttributionStore>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn build(config: AppConfig) -> Result<Self> {
    let api: Arc<dyn StorefrontApi> = Arc::new(HttpStorefrontApi::new(&config.api)?);
    let conversions: Arc<dyn ConversionsSink> = Arc::new(HttpConversions::new(&config.api)?);
    let attribution = Arc::new(AttributionStore::new(FileStorage::new(&config.attribution_store)));
    Ok(Self {
      api,
      conversions,
      attribution,
      config: Arc::new(config),
    })
  }

  pub fn submitter(&self) -> OrderSubmitter {
    OrderSubmitter::new(Arc::clone(&self.api), Arc::clone(&self.conversions))
  }
}
