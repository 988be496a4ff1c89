// storefront_cli/src/services/env_manager.rs

//! Switches the active `.env` between the development and production presets.

use crate::errors::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const TARGET_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvPreset {
  Dev,
  Prod,
}

impl EnvPreset {
  pub fn file_name(&self) -> &'static str {
    match self {
      EnvPreset::Dev => ".env.development",
      EnvPreset::Prod => ".env.production",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      EnvPreset::Dev => "development",
      EnvPreset::Prod => "production",
    }
  }
}

impl FromStr for EnvPreset {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "dev" => Ok(EnvPreset::Dev),
      "prod" => Ok(EnvPreset::Prod),
      other => Err(AppError::UnknownEnvironment(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchReport {
  pub preset: EnvPreset,
  /// Content of the new `.env`.
  pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
  Missing,
  Active { environment: String, base_url: String },
  /// `.env` exists but does not name both the environment and the base URL.
  Unrecognized(String),
}

pub struct EnvManager {
  root: PathBuf,
}

impl EnvManager {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn switch(&self, preset: EnvPreset) -> Result<SwitchReport> {
    let source = self.root.join(preset.file_name());
    if !source.exists() {
      return Err(AppError::EnvFileMissing(source));
    }
    let target = self.root.join(TARGET_ENV_FILE);
    fs::copy(&source, &target)?;
    tracing::info!(preset = preset.label(), target = %target.display(), "Environment switched.");
    Ok(SwitchReport {
      preset,
      content: fs::read_to_string(&target)?,
    })
  }

  pub fn status(&self) -> Result<EnvStatus> {
    let path = self.root.join(TARGET_ENV_FILE);
    if !path.exists() {
      return Ok(EnvStatus::Missing);
    }
    let content = fs::read_to_string(&path)?;
    Ok(parse_status(content))
  }
}

fn parse_status(content: String) -> EnvStatus {
  let value_of = |key: &str| {
    content
      .lines()
      .find_map(|line| line.trim().strip_prefix(key).map(str::trim))
      .filter(|v| !v.is_empty())
      .map(str::to_string)
  };
  let environment = value_of("API_ENV=").map(|v| {
    v.chars()
      .take_while(|c| c.is_alphanumeric() || *c == '_')
      .collect::<String>()
  });
  match (environment.filter(|e| !e.is_empty()), value_of("API_BASE_URL=")) {
    (Some(environment), Some(base_url)) => EnvStatus::Active { environment, base_url },
    _ => EnvStatus::Unrecognized(content),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
  }

  #[test]
  fn switch_copies_the_preset_over_dotenv() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".env.production", "API_ENV=production\nAPI_BASE_URL=https://api.brainnel.com/backend\n");
    write(dir.path(), ".env", "API_ENV=development\n");

    let manager = EnvManager::new(dir.path());
    let report = manager.switch(EnvPreset::Prod).unwrap();
    assert_eq!(report.preset, EnvPreset::Prod);
    assert!(report.content.contains("production"));
    assert_eq!(
      manager.status().unwrap(),
      EnvStatus::Active {
        environment: "production".to_string(),
        base_url: "https://api.brainnel.com/backend".to_string(),
      }
    );
  }

  #[test]
  fn missing_preset_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let manager = EnvManager::new(dir.path());
    assert!(matches!(manager.switch(EnvPreset::Dev), Err(AppError::EnvFileMissing(_))));
    assert!(!dir.path().join(".env").exists());
  }

  #[test]
  fn status_without_dotenv_or_with_partial_content() {
    let dir = tempfile::tempdir().unwrap();
    let manager = EnvManager::new(dir.path());
    assert_eq!(manager.status().unwrap(), EnvStatus::Missing);

    write(dir.path(), ".env", "ENABLE_CONSOLE_LOGS=true\nAPI_ENV=development\n");
    assert_eq!(
      manager.status().unwrap(),
      EnvStatus::Unrecognized("ENABLE_CONSOLE_LOGS=true\nAPI_ENV=development\n".to_string())
    );
  }

  #[test]
  fn only_dev_and_prod_are_presets() {
    assert_eq!("dev".parse::<EnvPreset>().unwrap(), EnvPreset::Dev);
    assert_eq!("prod".parse::<EnvPreset>().unwrap().file_name(), ".env.production");
    assert!(matches!("staging".parse::<EnvPreset>(), Err(AppError::UnknownEnvironment(ref e)) if e == "staging"));
  }
}
