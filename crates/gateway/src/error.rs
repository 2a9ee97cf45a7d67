use thiserror::Error;

/// Rejection of an inbound notification before any fan-out is scheduled.
/// Mapped to a client-error response by the HTTP boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing or empty 's3_url'")]
    MissingAssetUrl,
}
