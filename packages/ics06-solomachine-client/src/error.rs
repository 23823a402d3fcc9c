//! This module defines [`SoloMachineError`].

/// Rejections of the solo machine client. None of them mutate client state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum SoloMachineError {
    /// The client was frozen by misbehaviour
    #[error("client is frozen")]
    FrozenClient,

    /// Statement was not made with the current public key
    #[error("public key does not match the current public key")]
    InvalidPublicKey,

    /// Statement was not made for the current diversifier
    #[error("diversifier mismatch: expected `{expected}`, found `{found}`")]
    InvalidDiversifier {
        /// Current diversifier
        expected: String,
        /// Diversifier of the statement
        found: String,
    },

    /// Statement sequence is not the current sequence
    #[error("sequence mismatch: expected {expected}, found {found}")]
    SequenceMismatch {
        /// Current sequence
        expected: u64,
        /// Sequence of the statement
        found: u64,
    },

    /// Signature failed to verify
    #[error("invalid signature: {reason}")]
    InvalidSignature {
        /// Reason for error
        reason: String,
    },

    /// Statement timestamp is before the current timestamp
    #[error("timestamp {found} is before current timestamp {current}")]
    NonMonotonicTime {
        /// Current timestamp
        current: u64,
        /// Timestamp of the statement
        found: u64,
    },

    /// Public key bytes are malformed
    #[error("malformed public key: {reason}")]
    MalformedPublicKey {
        /// Reason for error
        reason: String,
    },

    /// Client state failed basic validation
    #[error("invalid client state: {reason}")]
    InvalidClientState {
        /// Reason for error
        reason: String,
    },

    /// Header failed basic validation
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// Proof could not be decoded
    #[error("invalid proof: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },

    /// Misbehaviour evidence is malformed
    #[error("invalid misbehaviour: {reason}")]
    InvalidMisbehaviour {
        /// Reason for error
        reason: String,
    },
}
