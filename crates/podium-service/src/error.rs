/// Error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The registry rejected the operation.
    #[error(transparent)]
    Store(#[from] podium_store::Error),
    /// The worker task is no longer running.
    #[error("service closed: the worker is no longer running")]
    Closed,
}
