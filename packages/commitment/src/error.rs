//! This module defines [`CommitmentError`].

/// Errors raised while decoding or verifying commitment proofs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum CommitmentError {
    #[error("empty commitment root")]
    EmptyCommitmentRoot,

    #[error("empty commitment prefix")]
    EmptyCommitmentPrefix,

    #[error("empty merkle path")]
    EmptyMerklePath,

    #[error("empty merkle proof")]
    EmptyMerkleProof,

    #[error("empty proof specs")]
    EmptyProofSpecs,

    #[error("invalid proof spec at index {index}: {reason}")]
    InvalidProofSpec { index: usize, reason: String },

    #[error("invalid merkle proof: {reason}")]
    InvalidMerkleProof { reason: String },

    #[error("computed root does not match: expected {expected}, found {found}")]
    RootMismatch { expected: String, found: String },

    #[error("proof verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("failed to decode proof: {0}")]
    Decode(String),
}
