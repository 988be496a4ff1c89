// storefront_cli/src/commands/mod.rs

pub mod attribution;
pub mod catalog;
pub mod checkout;
pub mod env;

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "storefront", about = "Flash-sale storefront: catalog, checkout and ad attribution", version)]
pub struct Cli {
  #[arg(
    long,
    global = true,
    action = ArgAction::SetTrue,
    help = "Render command output as pretty JSON when available"
  )]
  pub json: bool,
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Switch or show the active .env preset
  Env {
    /// dev, prod or status
    #[arg(default_value = "status")]
    target: String,
    #[arg(long, default_value = ".", help = "Directory holding the .env files")]
    root: PathBuf,
  },
  /// List level-1 categories
  Categories,
  /// List products, one page at a time
  Products(catalog::ProductsArgs),
  /// Show one product with its variants
  Product {
    id: u64,
  },
  /// List delivery districts
  Districts,
  #[command(subcommand)]
  Attribution(attribution::AttributionCommands),
  /// Place a cash-on-delivery order
  Checkout(checkout::CheckoutArgs),
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
