//! This module defines [`ClientTypesError`].

/// Errors raised while constructing or parsing the shared client primitives
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ClientTypesError {
    /// Height string is not of the form `{epoch}-{height}`
    #[error("invalid height `{height}`: {reason}")]
    InvalidHeight {
        /// The offending input
        height: String,
        /// Reason for error
        reason: String,
    },

    /// Identifier does not satisfy the identifier rules
    #[error("invalid identifier `{id}`: {reason}")]
    InvalidIdentifier {
        /// The offending identifier
        id: String,
        /// Reason for error
        reason: String,
    },

    /// Client type is not one of the supported client types
    #[error("unknown client type `{0}`")]
    UnknownClientType(String),

    /// Trust threshold outside of `[1/3, 1]` or with a zero denominator
    #[error("invalid trust threshold {numerator}/{denominator}, must be within [1/3, 1]")]
    InvalidTrustThreshold {
        /// Numerator of the fraction
        numerator: u64,
        /// Denominator of the fraction
        denominator: u64,
    },
}
