use {std::time::Duration, thiserror::Error};

/// Failure reported by a [`crate::ChannelSink`] implementation.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The channel id could not be resolved to a postable channel, e.g. the
    /// bot no longer has access. Recorded as a failed outcome, not retried.
    #[error("channel not found")]
    ChannelNotFound,

    #[error("send failed: {0}")]
    Send(#[source] anyhow::Error),
}

/// Why one subscriber's delivery attempt failed. Never propagated across
/// sibling deliveries; rendered into the outcome's `error_detail`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("asset fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),

    #[error("channel not found")]
    ChannelNotFound,

    #[error("send failed: {0}")]
    Send(#[source] anyhow::Error),

    #[error("{phase} timed out after {timeout:?}")]
    Timeout {
        phase: &'static str,
        timeout: Duration,
    },
}

impl From<SinkError> for DeliveryError {
    fn from(e: SinkError) -> Self {
        match e {
            SinkError::ChannelNotFound => Self::ChannelNotFound,
            SinkError::Send(source) => Self::Send(source),
        }
    }
}
