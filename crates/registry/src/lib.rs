//! Durable subscriber registry: a JSON-file store plus the in-memory
//! subscription manager shared between the command path and the fan-out path.

mod error;
mod manager;
pub mod store;

pub use {error::RegistryError, manager::SubscriptionManager};
