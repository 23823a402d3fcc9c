//! This module defines [`TendermintClientError`].

use ibc_light_client_types::{ClientTypesError, Height};
use ibc_light_commitment::CommitmentError;
use time::OffsetDateTime;

/// Rejections of the tendermint light client. None of them mutate client state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum TendermintClientError {
    /// Consensus state failed basic validation
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Client state failed basic validation
    #[error("invalid client state: {reason}")]
    InvalidClientState {
        /// Reason for error
        reason: String,
    },

    /// Header is not above its trusted height
    #[error("header height {header_height} must be greater than trusted height {trusted_height}")]
    InvalidHeight {
        /// Height of the header
        header_height: Height,
        /// Height of the trusted consensus state
        trusted_height: Height,
    },

    /// Header failed structural validation
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// The client was frozen by misbehaviour
    #[error("client is frozen at height {frozen_height}")]
    FrozenClient {
        /// Height the client was frozen at
        frozen_height: Height,
    },

    /// The trusted consensus state is outside of the trusting period
    #[error("trusted consensus state from {trusted_time} has expired at {now}")]
    ExpiredClient {
        /// Timestamp of the trusted consensus state
        trusted_time: OffsetDateTime,
        /// Current time
        now: OffsetDateTime,
    },

    /// Header time is not after the trusted time
    #[error("header time {header_time} must be after trusted time {trusted_time}")]
    NonMonotonicTime {
        /// Time of the header
        header_time: OffsetDateTime,
        /// Timestamp of the trusted consensus state
        trusted_time: OffsetDateTime,
    },

    /// Header time exceeds the allowed clock drift
    #[error("header time {header_time} is not before {max_time}")]
    HeaderTimeTooFarInFuture {
        /// Time of the header
        header_time: OffsetDateTime,
        /// Current time plus the maximum clock drift
        max_time: OffsetDateTime,
    },

    /// Not enough of the trusted validator set signed the header
    #[error("insufficient validator overlap: {reason}")]
    InsufficientValidatorOverlap {
        /// Reason for error
        reason: String,
    },

    /// Commit signatures are invalid or carry too little power
    #[error("invalid commit signatures: {reason}")]
    InvalidSignatures {
        /// Reason for error
        reason: String,
    },

    /// Commitment proof did not verify
    #[error("invalid merkle proof: {0}")]
    InvalidMerkleProof(#[from] CommitmentError),

    /// Proof height is above the latest height of the client
    #[error("proof height {proof_height} is above latest height {latest_height}")]
    ProofHeightTooHigh {
        /// Height of the proof
        proof_height: Height,
        /// Latest height of the client
        latest_height: Height,
    },

    /// Misbehaviour evidence is malformed
    #[error("invalid misbehaviour: {reason}")]
    InvalidMisbehaviour {
        /// Reason for error
        reason: String,
    },

    /// The two headers do not conflict
    #[error("misbehaviour not detected")]
    MisbehaviourNotDetected,

    /// Shared primitive failed validation
    #[error(transparent)]
    ClientTypes(#[from] ClientTypesError),
}
