// storefront/src/models/district.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Abidjan, used until a district is chosen.
pub const DEFAULT_CENTER: Coordinate = Coordinate { lat: 5.345, lng: -4.024 };
pub const DEFAULT_ZOOM: u8 = 12;
/// Zoom applied when the map centers on a single district.
pub const DISTRICT_ZOOM: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
  pub lat: f64,
  pub lng: f64,
}

impl Coordinate {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  pub fn is_valid(&self) -> bool {
    self.lat.is_finite()
      && self.lng.is_finite()
      && (-90.0..=90.0).contains(&self.lat)
      && (-180.0..=180.0).contains(&self.lng)
  }
}

impl fmt::Display for Coordinate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.6},{:.6}", self.lat, self.lng)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
  pub center: Coordinate,
  pub zoom: u8,
}

impl Default for MapView {
  fn default() -> Self {
    Self {
      center: DEFAULT_CENTER,
      zoom: DEFAULT_ZOOM,
    }
  }
}

/// Latitude/longitude as the backend sends them: sometimes numbers, sometimes
/// numeric strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WireNumber {
  Number(f64),
  Text(String),
}

impl WireNumber {
  pub fn to_f64(&self) -> Option<f64> {
    let value = match self {
      WireNumber::Number(n) => *n,
      WireNumber::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
  }
}

/// A district entry nested inside a city in the catalog response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogDistrict {
  pub id: u64,
  pub name: String,
  pub latitude: WireNumber,
  pub longitude: WireNumber,
}

/// One city of the catalog response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct City {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub districts: Vec<CatalogDistrict>,
}

/// A selectable delivery zone, annotated with its parent city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
  pub id: u64,
  pub name: String,
  pub city_id: u64,
  pub city_name: String,
  pub latitude: f64,
  pub longitude: f64,
}

impl District {
  pub fn center(&self) -> Coordinate {
    Coordinate::new(self.latitude, self.longitude)
  }
}
