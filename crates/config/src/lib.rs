//! Configuration loading for the ordering engine
//!
//! Supports loading from YAML files:
//! - catalog.yaml — menu sections, items, prices, supplements
//! - engine.yaml — phone number, currency, delivery fees, suggestion pools
//!
//! Both have built-in defaults so the engine runs with no config files at
//! all; loaded values are validated before the engine ever sees them.

pub mod catalog_file;
pub mod engine_settings;

pub use catalog_file::{default_catalog, load_catalog, parse_catalog};
pub use engine_settings::{DeliveryFees, EngineSettings};

use snackbot_core::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}: {1}")]
    FileNotFound(String, String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}
