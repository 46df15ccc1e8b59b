//! Configuration module.
//!
//! Handles loading configuration from TOML files, CLI argument merging,
//! and validation.

pub mod loader;
pub mod validation;

pub use loader::{Config, OptionsConfig, PortalConfig};
pub use validation::{validate_config, validate_student_id};
