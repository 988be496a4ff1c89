// storefront_cli/src/commands/attribution.rs
use crate::commands::print_json;
use crate::state::AppState;
use clap::Subcommand;
use storefront::CaptureOutcome;

#[derive(Subcommand)]
pub enum AttributionCommands {
  /// Record the ad source of a landing URL (first touch wins)
  Capture { url: String },
  /// Show the stored attribution
  Show,
  /// Forget the stored attribution
  Clear,
}

pub fn handle_attribution_command(state: &AppState, command: AttributionCommands, json: bool) -> anyhow::Result<()> {
  let store = &state.attribution;
  match command {
    AttributionCommands::Capture { url } => {
      let outcome = store.capture(&url);
      let ad_id = store.ad_id();
      match outcome {
        CaptureOutcome::Captured => println!("Captured ad id {}", ad_id.as_deref().unwrap_or("-")),
        CaptureOutcome::KeptExisting => println!("Kept earlier ad id {}", ad_id.as_deref().unwrap_or("-")),
        CaptureOutcome::NoAttribution => println!("No ad source in URL"),
      }
    }
    AttributionCommands::Show => {
      store.load();
      let snapshot = store.snapshot();
      if json {
        return print_json(&serde_json::json!({
          "ad_id": snapshot.ad_id,
          "has_ad_id": snapshot.has_ad_id,
          "captured_at": snapshot.captured_at,
          "tracking_info": snapshot.tracking_info,
        }));
      }
      match (&snapshot.ad_id, &snapshot.tracking_info) {
        (None, _) => println!("No attribution stored"),
        (Some(ad_id), record) => {
          println!("Ad id: {}", ad_id);
          if let Some(record) = record {
            println!("Captured at: {}", record.captured_at.to_rfc3339());
            println!("Landing URL: {}", record.url);
            println!("Facebook: {}  TikTok: {}", record.is_from_facebook, record.is_from_tiktok);
          }
        }
      }
    }
    AttributionCommands::Clear => {
      store.clear();
      println!("Attribution cleared");
    }
  }
  Ok(())
}
