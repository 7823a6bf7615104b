//! Assignment error type.

use prep_core::Mode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignmentError {
    /// No facility offers the requested activity kind.
    #[error("no facilities offer activity kind {0:?}")]
    NoFacilities(String),

    /// The distance table has no distribution for this mode.
    #[error("no distance distribution for mode {0}")]
    NoDistribution(Mode),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;
