use {async_trait::async_trait, bytes::Bytes};

use crate::error::SinkError;

/// The narrow chat-platform seam: resolve a channel id and post a caption
/// plus binary attachment to it. Implemented by the telegram adapter in
/// production and by fakes in tests.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    async fn post(&self, channel_id: &str, caption: &str, image: Bytes) -> Result<(), SinkError>;
}
