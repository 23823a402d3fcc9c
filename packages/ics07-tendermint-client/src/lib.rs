#![doc = include_str!("../README.md")]
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

#[cfg(test)]
use ics23 as _;

pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod header;
pub mod membership;
pub mod misbehaviour;
pub mod update;
pub mod validator;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client_state::ClientState;
pub use consensus_state::ConsensusState;
pub use error::TendermintClientError;
pub use header::Header;
pub use misbehaviour::Misbehaviour;
pub use update::{AppHashRoot, RootDeriver};
pub use validator::{Validator, ValidatorSet};
pub use verify::{Ed25519Verifier, SignatureVerifier};
