//! Closed unions over the supported client variants.

use ibc_light_client_types::{ClientType, Height};
use ics06_solomachine_client as solomachine;
use ics07_tendermint_client as tendermint;
use serde::{Deserialize, Serialize};

/// The client state of any supported client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum AnyClientState {
    /// 07-tendermint
    Tendermint(tendermint::ClientState),
    /// 06-solomachine
    SoloMachine(solomachine::ClientState),
}

impl AnyClientState {
    /// The client type of the state
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::SoloMachine(_) => ClientType::SoloMachine,
        }
    }

    /// The latest height the client has verified. Solo machines report their sequence as the
    /// height of epoch zero.
    #[must_use]
    pub const fn latest_height(&self) -> Height {
        match self {
            Self::Tendermint(client_state) => client_state.latest_height,
            Self::SoloMachine(client_state) => Height::new(0, client_state.sequence),
        }
    }

    /// Whether misbehaviour froze the client
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        match self {
            Self::Tendermint(client_state) => client_state.frozen_height.is_some(),
            Self::SoloMachine(client_state) => client_state.is_frozen,
        }
    }
}

/// The consensus state of any supported client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum AnyConsensusState {
    /// 07-tendermint
    Tendermint(tendermint::ConsensusState),
    /// 06-solomachine
    SoloMachine(solomachine::ConsensusState),
}

impl AnyConsensusState {
    /// The client type of the state
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::SoloMachine(_) => ClientType::SoloMachine,
        }
    }
}

/// A message submitted to update or freeze a client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
#[allow(clippy::large_enum_variant)]
pub enum AnyClientMessage {
    /// A tendermint header
    TendermintHeader(tendermint::Header),
    /// Two conflicting tendermint headers
    TendermintMisbehaviour(tendermint::Misbehaviour),
    /// A solo machine key rotation
    SoloMachineHeader(solomachine::Header),
    /// Two conflicting solo machine statements
    SoloMachineMisbehaviour(solomachine::Misbehaviour),
}

impl AnyClientMessage {
    /// The client type the message is meant for
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::TendermintHeader(_) | Self::TendermintMisbehaviour(_) => ClientType::Tendermint,
            Self::SoloMachineHeader(_) | Self::SoloMachineMisbehaviour(_) => {
                ClientType::SoloMachine
            }
        }
    }
}
