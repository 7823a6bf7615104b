//! Pipeline error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `PrepError` via `From` impls or keep them separate and wrap `PrepError`
//! as one variant.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.

use thiserror::Error;

use crate::{FacilityId, PersonId};

/// The top-level error type for `prep-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    #[error("facility {0} not found")]
    FacilityNotFound(FacilityId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `prep-*` crates.
pub type PrepResult<T> = Result<T, PrepError>;
