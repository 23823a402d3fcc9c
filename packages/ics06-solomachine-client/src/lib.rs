#![doc = include_str!("../README.md")]
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

pub mod client_state;
pub mod error;
pub mod header;
pub mod membership;
pub mod misbehaviour;
pub mod public_key;
pub mod sign_bytes;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client_state::{ClientState, ConsensusState, SequencePolicy};
pub use error::SoloMachineError;
pub use header::Header;
pub use misbehaviour::{Misbehaviour, SignatureAndData};
pub use public_key::PublicKey;
pub use sign_bytes::DataType;
pub use verify::{verify_solo_machine_update, SignedData};
