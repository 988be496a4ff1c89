// storefront_cli/src/commands/checkout.rs
use crate::commands::print_json;
use crate::errors::AppError;
use crate::state::AppState;
use clap::Args;
use std::time::Duration;
use storefront::checkout::{CheckoutSession, FixedPosition, Geolocator, NoGeolocation, ProductSelection};
use storefront::conversions::ClientInfo;
use storefront::models::{ContactInfo, Coordinate};
use storefront::StorefrontError;
use tracing::{info, warn};

/// How long the process lingers for the purchase conversion once the
/// confirmation is printed.
const CONVERSION_GRACE: Duration = Duration::from_secs(10);

#[derive(Args)]
pub struct CheckoutArgs {
  #[arg(long, help = "Product id")]
  pub product: u64,
  #[arg(long, default_value_t = 1)]
  pub quantity: u32,
  #[arg(long, help = "District id, see `storefront districts`")]
  pub district: u64,
  #[arg(long, allow_hyphen_values = true, help = "Delivery pin latitude")]
  pub lat: f64,
  #[arg(long, allow_hyphen_values = true, help = "Delivery pin longitude")]
  pub lng: f64,
  #[arg(long, help = "Full name of the receiver")]
  pub name: String,
  #[arg(long, help = "10-digit local phone number")]
  pub phone: String,
  #[arg(long, help = "10-digit local WhatsApp number")]
  pub whatsapp: String,
  #[arg(long, help = "Landmarks that help the courier find the address")]
  pub address: String,
  #[arg(long, help = "Landing URL carrying the ad parameters")]
  pub landing_url: Option<String>,
  #[arg(long, allow_hyphen_values = true, requires = "device_lng")]
  pub device_lat: Option<f64>,
  #[arg(long, allow_hyphen_values = true, requires = "device_lat")]
  pub device_lng: Option<f64>,
}

pub async fn handle_checkout(state: &AppState, args: CheckoutArgs, json: bool) -> anyhow::Result<()> {
  let ad_id = state.attribution.initialize(args.landing_url.as_deref());
  info!(ad_id = ?ad_id, "Attribution ready.");

  let product = state.api.get_product(args.product).await?;
  let selection = ProductSelection::with_quantity(product, args.quantity)?;

  let geolocator: Box<dyn Geolocator> = match (args.device_lat, args.device_lng) {
    (Some(lat), Some(lng)) => Box::new(FixedPosition(Coordinate::new(lat, lng))),
    _ => Box::new(NoGeolocation),
  };

  let mut session = CheckoutSession::new(selection);
  session
    .load_districts(state.api.as_ref())
    .await
    .map_err(AppError::DistrictsUnavailable)?;
  session.select_district(args.district, geolocator.as_ref()).await?;
  session.place_pin(Coordinate::new(args.lat, args.lng))?;
  session.confirm_pin()?;
  session.fill_contact(&ContactInfo {
    full_name: args.name,
    phone: args.phone,
    whatsapp: args.whatsapp,
    address_description: args.address,
  })?;

  let client = ClientInfo {
    user_agent: Some(format!("storefront-cli/{}", env!("CARGO_PKG_VERSION"))),
    ..ClientInfo::default()
  };
  let submitter = state.submitter();
  let receipt = match session.submit(&submitter, &state.attribution, client).await {
    Ok(receipt) => receipt,
    Err(StorefrontError::Validation(errors)) => {
      for (field, message) in &errors {
        eprintln!("{}: {}", field, message);
      }
      return Err(StorefrontError::Validation(errors).into());
    }
    Err(e) => return Err(e.into()),
  };

  let confirmation = &receipt.confirmation;
  if json {
    print_json(confirmation)?;
  } else {
    println!("Order placed: {}", confirmation.order.reference().as_deref().unwrap_or("-"));
    println!("Pickup code: {}", confirmation.pickup_code());
    println!(
      "Total: {} FCFA for {} x {}",
      confirmation.total_price, confirmation.quantity, confirmation.product.name_fr
    );
    println!(
      "Delivery: {} ({}), pay cash on delivery",
      confirmation.district.name, confirmation.district.city_name
    );
  }

  if let Some(task) = receipt.conversion_task {
    if tokio::time::timeout(CONVERSION_GRACE, task).await.is_err() {
      warn!("Purchase conversion still pending at exit.");
    }
  }
  let counts = submitter.stats().counts();
  info!(sent = counts.sent, skipped = counts.skipped, failed = counts.failed, "Conversion delivery.");
  Ok(())
}
