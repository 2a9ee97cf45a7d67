//! Shared types for the fanpost workspace: subscribers, notification
//! payloads, and per-subscriber delivery outcomes.

pub mod types;

pub use types::{DeliveryOutcome, DeliveryReport, NotificationPayload, Subscriber};
