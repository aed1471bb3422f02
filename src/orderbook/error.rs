//! Order book error types

use std::fmt::Debug;
use thiserror::Error;

/// Errors surfaced by the checked entry points and the snapshot codec.
///
/// Matching itself is infallible by construction: an empty book, an
/// unfillable fill-or-kill, or a policy veto are all ordinary outcomes
/// expressed through the fill stream and the terminal book state, never
/// through an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrderBookError<Q: Debug> {
    /// An order carried a zero or negative quantity.
    #[error("order quantity must be positive, got {quantity:?}")]
    NonPositiveQuantity {
        /// The offending quantity.
        quantity: Q,
    },

    /// Snapshot serialization failed.
    #[error("snapshot serialization failed: {message}")]
    Serialization {
        /// Underlying error message.
        message: String,
    },

    /// Snapshot deserialization failed.
    #[error("snapshot deserialization failed: {message}")]
    Deserialization {
        /// Underlying error message.
        message: String,
    },
}
