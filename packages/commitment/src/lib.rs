#![doc = include_str!("../README.md")]
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

pub mod commitment;
pub mod error;
pub mod merkle;
pub mod specs;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use commitment::CommitmentRoot;
pub use error::CommitmentError;
pub use merkle::{MerklePath, MerkleProof};
pub use specs::ProofSpecs;
pub use verify::{verify_membership, verify_non_membership};
