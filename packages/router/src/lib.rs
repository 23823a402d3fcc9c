#![doc = include_str!("../README.md")]
#![deny(
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    warnings,
    unused_crate_dependencies
)]

#[cfg(test)]
use {::tendermint as _, ics23 as _, tracing_subscriber as _};

pub mod any;
pub mod config;
pub mod error;
pub mod router;
pub mod solomachine;
pub mod tendermint;
pub mod verifier;

pub use any::{AnyClientMessage, AnyClientState, AnyConsensusState};
pub use config::ClientParams;
pub use error::RouterError;
pub use router::{ClientRouter, UpdateOutcome};
pub use solomachine::SoloMachineVerifier;
pub use tendermint::{DefaultTendermintVerifier, TendermintVerifier};
pub use verifier::{ClientContext, ClientVerifier, StateUpdate};
