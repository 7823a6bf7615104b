//! Batch engine error type.

use thiserror::Error;

/// Errors surfaced by [`run_batch`][crate::run_batch].
#[derive(Debug, Error)]
pub enum BatchError {
    /// Invalid configuration, detected before any worker starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A transform failed on some record.  Fatal to the whole run: retrying
    /// or skipping a record would break the exhaustive-partition guarantee.
    #[error("transform failed: {0}")]
    Transform(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The run was cancelled through its [`CancelToken`][crate::CancelToken]
    /// before all records were processed.
    #[error("batch run cancelled")]
    Cancelled,
}

impl BatchError {
    /// Wrap a domain error as a fatal transform failure.
    pub fn transform<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BatchError::Transform(Box::new(err))
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
