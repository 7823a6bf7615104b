//! Population error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    /// A plan violates the activity/leg alternation invariant.
    #[error("malformed plan: {0}")]
    MalformedPlan(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
