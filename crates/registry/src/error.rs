use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Unsubscribe of a channel that is not in the registry.
    #[error("channel is not subscribed")]
    NotSubscribed,

    /// The registry could not be written to disk. The in-memory state still
    /// reflects the mutation; callers surface this as a warning.
    #[error("failed to persist registry: {0}")]
    Persistence(#[from] std::io::Error),
}
