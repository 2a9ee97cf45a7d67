//! Delivery fan-out engine: given one notification and a subscriber
//! snapshot, concurrently fetch the asset and post it to every subscriber,
//! isolating per-channel failures.

mod engine;
mod error;
mod fetch;
mod sink;

pub use {
    engine::DeliveryEngine,
    error::{DeliveryError, SinkError},
    fetch::{AssetFetcher, HttpAssetFetcher},
    sink::ChannelSink,
};
