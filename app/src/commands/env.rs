// storefront_cli/src/commands/env.rs
use crate::services::env_manager::{EnvManager, EnvPreset, EnvStatus, TARGET_ENV_FILE};
use std::path::Path;

pub fn handle_env_command(target: &str, root: &Path) -> anyhow::Result<()> {
  let manager = EnvManager::new(root);

  if target == "status" {
    match manager.status()? {
      EnvStatus::Missing => println!("No {} file found in {}", TARGET_ENV_FILE, manager.root().display()),
      EnvStatus::Active { environment, base_url } => {
        println!("Current environment: {}", environment);
        println!("API base URL: {}", base_url);
      }
      EnvStatus::Unrecognized(content) => {
        println!("Current {} content:", TARGET_ENV_FILE);
        println!("{}", content);
      }
    }
    return Ok(());
  }

  let preset: EnvPreset = target.parse()?;
  let report = manager.switch(preset)?;
  println!("Switched to {} environment", report.preset.label());
  println!("Using configuration file: {}", report.preset.file_name());
  println!("Current configuration:");
  println!("{}", report.content);
  Ok(())
}
