//! Configuration for the fanpost service: TOML schema with defaults and
//! fail-soft discovery from standard locations.

mod loader;
mod schema;

pub use {
    loader::{discover_and_load, find_config_file, load_config},
    schema::{DeliveryConfig, FanpostConfig, ServerConfig, TelegramConfig},
};
