// storefront/src/attribution/mod.rs

//! First-touch ad attribution.
//!
//! An `AttributionStore` is built once by the application's composition root
//! and lent by reference to whoever needs the ad id. Storage failures are
//! logged and never surface to the caller.

use crate::models::attribution::AttributionRecord;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

pub mod params;
pub mod storage;

pub use params::LandingParams;
pub use storage::{AttributionStorage, FileStorage, MemoryStorage, StoredAttribution};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
  /// The landing URL carried an ad source and nothing was held before.
  Captured,
  /// An earlier capture exists; first touch wins.
  KeptExisting,
  /// The landing URL carries no ad source.
  NoAttribution,
}

/// Everything known about the current attribution, as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionSnapshot {
  pub ad_id: Option<String>,
  pub tracking_info: Option<AttributionRecord>,
  pub has_ad_id: bool,
  pub captured_at: Option<DateTime<Utc>>,
}

pub struct AttributionStore {
  storage: Box<dyn AttributionStorage>,
  state: RwLock<StoredAttribution>,
}

impl AttributionStore {
  pub fn new(storage: impl AttributionStorage + 'static) -> Self {
    Self {
      storage: Box::new(storage),
      state: RwLock::new(StoredAttribution::default()),
    }
  }

  pub fn in_memory() -> Self {
    Self::new(MemoryStorage::new())
  }

  /// Page-load entry point: capture from the landing URL when it carries an ad
  /// source, otherwise hydrate from storage. Returns the resulting ad id.
  pub fn initialize(&self, landing_url: Option<&str>) -> Option<String> {
    let outcome = landing_url.map(|url| self.capture(url));
    if !matches!(outcome, Some(CaptureOutcome::Captured) | Some(CaptureOutcome::KeptExisting)) {
      self.load();
    }
    self.ad_id()
  }

  pub fn capture(&self, landing_url: &str) -> CaptureOutcome {
    self.capture_at(landing_url, Utc::now())
  }

  pub fn capture_at(&self, landing_url: &str, now: DateTime<Utc>) -> CaptureOutcome {
    let params = LandingParams::parse(landing_url);
    let Some(ad_source) = params.ad_source() else {
      debug!("No ad source on landing URL.");
      return CaptureOutcome::NoAttribution;
    };

    if self.state.read().ad_id.is_none() {
      self.load();
    }
    if let Some(existing) = self.state.read().ad_id.clone() {
      debug!(
        existing_ad_id = %existing,
        ignored_ad_id = %ad_source,
        "Attribution already captured; keeping first touch."
      );
      return CaptureOutcome::KeptExisting;
    }

    let record = params.tracking_record(now);
    let stored = StoredAttribution {
      ad_id: Some(ad_source.clone()),
      tracking_info: Some(record),
    };
    self.persist(&stored);
    *self.state.write() = stored;
    info!(ad_id = %ad_source, "Ad attribution captured from landing URL.");
    CaptureOutcome::Captured
  }

  /// Replaces the in-memory state with whatever storage holds.
  pub fn load(&self) -> Option<String> {
    match self.storage.load() {
      Ok(Some(stored)) => {
        debug!(ad_id = ?stored.ad_id, "Attribution restored from storage.");
        let ad_id = stored.ad_id.clone();
        *self.state.write() = stored;
        ad_id
      }
      Ok(None) => {
        debug!("No stored attribution.");
        None
      }
      Err(e) => {
        warn!(error = %e, "Failed to read stored attribution.");
        None
      }
    }
  }

  pub fn clear(&self) {
    if let Err(e) = self.storage.clear() {
      warn!(error = %e, "Failed to clear stored attribution.");
    }
    *self.state.write() = StoredAttribution::default();
    info!("Ad attribution cleared.");
  }

  /// Manual override, e.g. for support or testing. The tracking record is kept.
  pub fn set_ad_id(&self, ad_id: impl Into<String>) {
    let ad_id = ad_id.into();
    if ad_id.trim().is_empty() {
      return;
    }
    let stored = {
      let mut state = self.state.write();
      state.ad_id = Some(ad_id);
      state.clone()
    };
    self.persist(&stored);
  }

  pub fn ad_id(&self) -> Option<String> {
    self.state.read().ad_id.clone()
  }

  pub fn has_attribution(&self) -> bool {
    self.state.read().ad_id.is_some()
  }

  pub fn record(&self) -> Option<AttributionRecord> {
    self.state.read().tracking_info.clone()
  }

  pub fn snapshot(&self) -> AttributionSnapshot {
    let state = self.state.read();
    AttributionSnapshot {
      ad_id: state.ad_id.clone(),
      tracking_info: state.tracking_info.clone(),
      has_ad_id: state.ad_id.is_some(),
      captured_at: state.tracking_info.as_ref().map(|t| t.captured_at),
    }
  }

  fn persist(&self, stored: &StoredAttribution) {
    if let Err(e) = self.storage.save(stored) {
      warn!(error = %e, "Failed to persist attribution.");
    }
  }
}
