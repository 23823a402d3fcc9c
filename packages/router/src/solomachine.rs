//! [`ClientVerifier`] for 06-solomachine clients.
//!
//! Solo machines have no block heights. The client sequence is exposed as the height of epoch
//! zero, and the `proof_height` of membership statements carries the sequence they were signed
//! at.

use ibc_light_client_types::{ClientStatus, ClientType, Height};
use ibc_light_commitment::MerklePath;
use ibc_light_utils::ensure;
use ics06_solomachine_client::{
    header::{apply_header, verify_header},
    membership, misbehaviour, ClientState, SoloMachineError,
};

use crate::{
    any::{AnyClientMessage, AnyClientState, AnyConsensusState},
    error::RouterError,
    verifier::{ClientContext, ClientVerifier, StateUpdate},
};

/// Verifies solo machine clients
#[derive(Clone, Copy, Debug, Default)]
pub struct SoloMachineVerifier;

const fn as_client_state(client_state: &AnyClientState) -> Result<&ClientState, RouterError> {
    match client_state {
        AnyClientState::SoloMachine(client_state) => Ok(client_state),
        other => Err(RouterError::MismatchedClientState {
            expected: ClientType::SoloMachine,
            found: other.client_type(),
        }),
    }
}

const fn mismatched_message(message: &AnyClientMessage) -> RouterError {
    RouterError::MismatchedClientMessage {
        expected: ClientType::SoloMachine,
        found: message.client_type(),
    }
}

/// The sequence a membership statement was signed at. Only epoch zero carries sequences.
fn proof_sequence(proof_height: Height) -> Result<u64, RouterError> {
    ensure!(
        proof_height.epoch_number == 0,
        RouterError::InvalidProofHeight(proof_height)
    );
    Ok(proof_height.epoch_height)
}

impl ClientVerifier for SoloMachineVerifier {
    fn validate(
        &self,
        client_state: &AnyClientState,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), RouterError> {
        let client_state = as_client_state(client_state)?;
        let AnyConsensusState::SoloMachine(consensus_state) = consensus_state else {
            return Err(RouterError::MismatchedConsensusState {
                expected: ClientType::SoloMachine,
                found: consensus_state.client_type(),
            });
        };

        client_state.validate()?;
        ensure!(
            consensus_state == &client_state.consensus_state,
            SoloMachineError::InvalidClientState {
                reason: "consensus state does not match the client state".to_string(),
            }
            .into()
        );
        Ok(())
    }

    fn verify_client_message(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<(), RouterError> {
        let client_state = as_client_state(ctx.client_state)?;

        match message {
            AnyClientMessage::SoloMachineHeader(header) => {
                verify_header(client_state, header)?;
            }
            AnyClientMessage::SoloMachineMisbehaviour(evidence) => {
                misbehaviour::verify_misbehaviour(client_state, evidence)?;
            }
            other => return Err(mismatched_message(other)),
        }

        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        _ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<Option<Height>, RouterError> {
        match message {
            AnyClientMessage::SoloMachineHeader(_) => Ok(None),
            AnyClientMessage::SoloMachineMisbehaviour(evidence) => {
                Ok(Some(Height::new(0, evidence.sequence)))
            }
            other => Err(mismatched_message(other)),
        }
    }

    fn update_state(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<StateUpdate, RouterError> {
        let client_state = as_client_state(ctx.client_state)?;

        let header = match message {
            AnyClientMessage::SoloMachineHeader(header) => header,
            AnyClientMessage::SoloMachineMisbehaviour(_) => {
                return Err(RouterError::UnexpectedClientMessage {
                    reason: "misbehaviour does not update state".to_string(),
                })
            }
            other => return Err(mismatched_message(other)),
        };

        let rotated = apply_header(client_state, header);
        let consensus_state = AnyConsensusState::SoloMachine(rotated.consensus_state.clone());

        Ok(StateUpdate {
            client_state: AnyClientState::SoloMachine(rotated),
            consensus_state: Some((Height::new(0, header.sequence), consensus_state)),
        })
    }

    fn update_state_on_misbehaviour(
        &self,
        client_state: &AnyClientState,
        _freeze_height: Height,
    ) -> Result<AnyClientState, RouterError> {
        let client_state = as_client_state(client_state)?;
        Ok(AnyClientState::SoloMachine(
            misbehaviour::update_state_on_misbehaviour(client_state),
        ))
    }

    fn verify_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
        value: &[u8],
    ) -> Result<Option<AnyClientState>, RouterError> {
        let client_state = as_client_state(ctx.client_state)?;
        let advanced = membership::verify_membership(
            client_state,
            proof_sequence(proof_height)?,
            proof,
            path,
            value,
        )?;
        Ok(Some(AnyClientState::SoloMachine(advanced)))
    }

    fn verify_non_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
    ) -> Result<Option<AnyClientState>, RouterError> {
        let client_state = as_client_state(ctx.client_state)?;
        let advanced = membership::verify_non_membership(
            client_state,
            proof_sequence(proof_height)?,
            proof,
            path,
        )?;
        Ok(Some(AnyClientState::SoloMachine(advanced)))
    }

    fn status(&self, ctx: &ClientContext<'_>) -> Result<ClientStatus, RouterError> {
        Ok(as_client_state(ctx.client_state)?.status())
    }
}
