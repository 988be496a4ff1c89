// storefront/src/checkout/catalog.rs
use crate::api::StorefrontApi;
use crate::error::{StorefrontError, StorefrontResult};
use crate::models::district::{City, District};
use tracing::{info, instrument};

/// Flattens the city→district catalog, keeping catalog order and annotating
/// each district with its parent city. A coordinate that does not parse as a
/// finite number rejects the whole catalog.
pub fn flatten_catalog(cities: &[City]) -> StorefrontResult<Vec<District>> {
  let mut districts = Vec::with_capacity(cities.iter().map(|c| c.districts.len()).sum());
  for city in cities {
    for entry in &city.districts {
      let (latitude, longitude) = match (entry.latitude.to_f64(), entry.longitude.to_f64()) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
          return Err(StorefrontError::InvalidCatalog(format!(
            "district {} ({}) has unparseable coordinates {:?}/{:?}",
            entry.id, entry.name, entry.latitude, entry.longitude
          )))
        }
      };
      districts.push(District {
        id: entry.id,
        name: entry.name.clone(),
        city_id: city.id,
        city_name: city.name.clone(),
        latitude,
        longitude,
      });
    }
  }
  Ok(districts)
}

/// Fetches and flattens the catalog. No retry: the caller decides.
#[instrument(skip(api), err)]
pub async fn load_districts(api: &dyn StorefrontApi) -> StorefrontResult<Vec<District>> {
  let cities = api.list_districts().await?;
  let districts = flatten_catalog(&cities)?;
  info!(cities = cities.len(), districts = districts.len(), "District catalog loaded.");
  Ok(districts)
}
