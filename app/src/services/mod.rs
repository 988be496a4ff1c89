// storefront_cli/src/services/mod.rs

pub mod env_manager;
