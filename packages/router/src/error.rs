//! This module defines [`RouterError`].

use ibc_light_client_types::{ClientId, ClientType, ClientTypesError, Height};
use ics06_solomachine_client::SoloMachineError;
use ics07_tendermint_client::TendermintClientError;

/// Errors of routing and dispatching client messages
#[derive(thiserror::Error, Debug)]
#[allow(missing_docs, clippy::module_name_repetitions)]
pub enum RouterError {
    #[error("unknown client type: {0}")]
    UnknownClientType(String),

    #[error("client type {0} is not allowed")]
    ClientTypeNotAllowed(ClientType),

    #[error("no verifier registered for client type {0}")]
    VerifierNotRegistered(ClientType),

    #[error("client {client_id} does not belong to client type {client_type}")]
    ClientIdMismatch {
        client_id: ClientId,
        client_type: ClientType,
    },

    #[error("mismatched client state: expected {expected}, found {found}")]
    MismatchedClientState {
        expected: ClientType,
        found: ClientType,
    },

    #[error("mismatched consensus state: expected {expected}, found {found}")]
    MismatchedConsensusState {
        expected: ClientType,
        found: ClientType,
    },

    #[error("mismatched client message: expected {expected}, found {found}")]
    MismatchedClientMessage {
        expected: ClientType,
        found: ClientType,
    },

    #[error("consensus state not found for client {client_id} at height {height}")]
    ConsensusStateNotFound { client_id: ClientId, height: Height },

    #[error("proof height {0} is not a solo machine sequence")]
    InvalidProofHeight(Height),

    #[error("client message cannot update state: {reason}")]
    UnexpectedClientMessage { reason: String },

    #[error("invalid client params: {0}")]
    InvalidParams(#[source] serde_json::Error),

    #[error("tendermint client: {0}")]
    Tendermint(#[from] TendermintClientError),

    #[error("solo machine client: {0}")]
    SoloMachine(#[from] SoloMachineError),

    #[error(transparent)]
    ClientTypes(#[from] ClientTypesError),
}
