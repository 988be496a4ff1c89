// storefront/src/checkout/location.rs

//! Delivery pin capture on top of a district-centred map view.

use crate::error::{StorefrontError, StorefrontResult};
use crate::models::district::{Coordinate, District, MapView, DISTRICT_ZOOM};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the device position. Errors are opaque platform failures
/// (permission denied, no fix) and are never shown to the buyer.
#[async_trait]
pub trait Geolocator: Send + Sync {
  async fn current_position(&self) -> anyhow::Result<Coordinate>;
}

/// No positioning hardware or permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
  async fn current_position(&self) -> anyhow::Result<Coordinate> {
    anyhow::bail!("geolocation unavailable")
  }
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinate);

#[async_trait]
impl Geolocator for FixedPosition {
  async fn current_position(&self) -> anyhow::Result<Coordinate> {
    Ok(self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
  NoDistrict,
  DistrictChosen,
  PinPlaced,
}

#[derive(Debug, Clone)]
pub struct LocationPicker {
  district: Option<District>,
  view: MapView,
  pin: Option<Coordinate>,
  device_position: Option<Coordinate>,
  geolocation_timeout: Duration,
}

impl Default for LocationPicker {
  fn default() -> Self {
    Self::new(GEOLOCATION_TIMEOUT)
  }
}

impl LocationPicker {
  pub fn new(geolocation_timeout: Duration) -> Self {
    Self {
      district: None,
      view: MapView::default(),
      pin: None,
      device_position: None,
      geolocation_timeout,
    }
  }

  pub fn state(&self) -> PickerState {
    match (&self.district, &self.pin) {
      (None, _) => PickerState::NoDistrict,
      (Some(_), None) => PickerState::DistrictChosen,
      (Some(_), Some(_)) => PickerState::PinPlaced,
    }
  }

  /// Centers on the district and forgets any previous pin.
  pub fn select_district(&mut self, district: District) {
    self.view = MapView {
      center: district.center(),
      zoom: DISTRICT_ZOOM,
    };
    self.pin = None;
    info!(district_id = district.id, district = %district.name, "District selected.");
    self.district = Some(district);
  }

  /// Best-effort device fix, bounded by the configured timeout. Failure or
  /// timeout leaves the previous position (if any) in place.
  pub async fn locate_device(&mut self, geolocator: &dyn Geolocator) -> Option<Coordinate> {
    match tokio::time::timeout(self.geolocation_timeout, geolocator.current_position()).await {
      Ok(Ok(position)) if position.is_valid() => {
        debug!(%position, "Device position obtained.");
        self.device_position = Some(position);
      }
      Ok(Ok(position)) => debug!(%position, "Ignoring out-of-range device position."),
      Ok(Err(e)) => debug!(error = %e, "Device position unavailable."),
      Err(_) => debug!(timeout = ?self.geolocation_timeout, "Device position timed out."),
    }
    self.device_position
  }

  /// Sets the single delivery pin, replacing any previous one.
  pub fn place_pin(&mut self, coordinate: Coordinate) -> StorefrontResult<()> {
    if self.district.is_none() {
      return Err(StorefrontError::Internal("a district must be chosen before placing a pin".to_string()));
    }
    if !coordinate.is_valid() {
      return Err(StorefrontError::InvalidCoordinate {
        lat: coordinate.lat,
        lng: coordinate.lng,
      });
    }
    debug!(%coordinate, replaced = self.pin.is_some(), "Pin placed.");
    self.pin = Some(coordinate);
    Ok(())
  }

  /// Pins the known device position and recenters on it. Without one, retries
  /// geolocation and places nothing. Returns whether a pin was placed.
  pub async fn use_current_location(&mut self, geolocator: &dyn Geolocator) -> StorefrontResult<bool> {
    match self.device_position {
      Some(position) => {
        self.place_pin(position)?;
        self.view.center = position;
        Ok(true)
      }
      None => {
        self.locate_device(geolocator).await;
        Ok(false)
      }
    }
  }

  pub fn can_confirm(&self) -> bool {
    self.district.is_some() && self.pin.is_some()
  }

  /// Back to district selection: the pin must be placed again.
  pub fn reset(&mut self) {
    self.district = None;
    self.pin = None;
  }

  pub fn district(&self) -> Option<&District> {
    self.district.as_ref()
  }

  pub fn pin(&self) -> Option<Coordinate> {
    self.pin
  }

  pub fn device_position(&self) -> Option<Coordinate> {
    self.device_position
  }

  pub fn view(&self) -> MapView {
    self.view
  }
}
