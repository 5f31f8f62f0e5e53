//! Public error type for composition.
//!
//! Every failure the engine can produce is an `InvalidInput`: composition is
//! an all-or-nothing definitional step performed before any instances exist,
//! so there is nothing to retry and no degraded fallback. Failures surface
//! synchronously and leave already-staged state unchanged.

use thiserror::Error;

/// Error raised when composition or dispatch is handed input it cannot act
/// on: a hook target that resolves on no surface, an empty feature list, a
/// nested list beyond the single flatten level, or a dispatch on an unknown
/// member name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}
