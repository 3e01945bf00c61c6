//! Shared utilities.
//!
//! Currently holds the TOML configuration layer with hot reload.

pub mod toml_config;

pub use toml_config::{ConfigError, ScriptoriumConfig, ScriptoriumConfigManager};
