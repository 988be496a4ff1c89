// storefront_cli/src/main.rs

mod commands;
mod config;
mod errors;
mod services;
mod state;

use crate::commands::{Cli, Commands};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::state::AppState;

use clap::Parser;
use std::process::ExitCode;
use storefront::StorefrontError;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = ?e, "Command failed.");
      eprintln!("{}", user_message(&e));
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let json = cli.json;
  if let Commands::Env { target, root } = &cli.command {
    return commands::env::handle_env_command(target, root);
  }

  let state = AppState::build(AppConfig::from_env()?)?;
  tracing::debug!(environment = %state.config.api.environment, "Storefront client ready.");

  match cli.command {
    Commands::Env { .. } => Ok(()),
    Commands::Categories => commands::catalog::handle_categories(&state, json).await,
    Commands::Products(args) => commands::catalog::handle_products(&state, args, json).await,
    Commands::Product { id } => commands::catalog::handle_product(&state, id, json).await,
    Commands::Districts => commands::catalog::handle_districts(&state, json).await,
    Commands::Attribution(command) => commands::attribution::handle_attribution_command(&state, command, json),
    Commands::Checkout(args) => commands::checkout::handle_checkout(&state, args, json).await,
  }
}

fn user_message(err: &anyhow::Error) -> String {
  if let Some(app) = err.downcast_ref::<AppError>() {
    return app.user_message();
  }
  if let Some(storefront) = err.downcast_ref::<StorefrontError>() {
    return storefront.user_message();
  }
  format!("{:#}", err)
}
