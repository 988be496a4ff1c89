// storefront/src/attribution/storage.rs

//! Durable backends for the attribution store.

use crate::error::{StorefrontError, StorefrontResult};
use crate::models::attribution::AttributionRecord;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What survives between sessions: the ad id and the full record are kept
/// side by side, since the id can also be set on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredAttribution {
  pub ad_id: Option<String>,
  pub tracking_info: Option<AttributionRecord>,
}

impl StoredAttribution {
  pub fn is_empty(&self) -> bool {
    self.ad_id.is_none() && self.tracking_info.is_none()
  }
}

pub trait AttributionStorage: Send + Sync {
  fn load(&self) -> StorefrontResult<Option<StoredAttribution>>;
  fn save(&self, value: &StoredAttribution) -> StorefrontResult<()>;
  fn clear(&self) -> StorefrontResult<()>;
}

/// A single JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
  path: PathBuf,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl AttributionStorage for FileStorage {
  fn load(&self) -> StorefrontResult<Option<StoredAttribution>> {
    if !self.path.exists() {
      return Ok(None);
    }
    let text = fs::read_to_string(&self.path)?;
    let stored: StoredAttribution = serde_json::from_str(&text)
      .map_err(|e| StorefrontError::Storage(format!("corrupt attribution file {}: {}", self.path.display(), e)))?;
    Ok((!stored.is_empty()).then_some(stored))
  }

  fn save(&self, value: &StoredAttribution) -> StorefrontResult<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    // readers only ever see a complete document
    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, &self.path)?;
    Ok(())
  }

  fn clear(&self) -> StorefrontResult<()> {
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  slot: Mutex<Option<StoredAttribution>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(value: StoredAttribution) -> Self {
    Self {
      slot: Mutex::new(Some(value)),
    }
  }
}

impl AttributionStorage for MemoryStorage {
  fn load(&self) -> StorefrontResult<Option<StoredAttribution>> {
    Ok(self.slot.lock().clone())
  }

  fn save(&self, value: &StoredAttribution) -> StorefrontResult<()> {
    *self.slot.lock() = Some(value.clone());
    Ok(())
  }

  fn clear(&self) -> StorefrontResult<()> {
    *self.slot.lock() = None;
    Ok(())
  }
}
