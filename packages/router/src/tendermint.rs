//! [`ClientVerifier`] for 07-tendermint clients.

use ibc_light_client_types::{ClientStatus, ClientType, Height};
use ibc_light_commitment::MerklePath;
use ics07_tendermint_client::{
    membership, misbehaviour, update, verify, AppHashRoot, ClientState, ConsensusState,
    Ed25519Verifier, RootDeriver, SignatureVerifier,
};

use crate::{
    any::{AnyClientMessage, AnyClientState, AnyConsensusState},
    error::RouterError,
    verifier::{ClientContext, ClientVerifier, StateUpdate},
};

/// Verifies tendermint clients with an injected signature scheme and commitment root derivation
#[derive(Clone, Copy, Debug, Default)]
pub struct TendermintVerifier<V = Ed25519Verifier, R = AppHashRoot> {
    signature_verifier: V,
    root_deriver: R,
}

/// [`TendermintVerifier`] with ed25519 signatures and the app hash as commitment root
pub type DefaultTendermintVerifier = TendermintVerifier<Ed25519Verifier, AppHashRoot>;

impl<V, R> TendermintVerifier<V, R> {
    /// Create a verifier
    pub const fn new(signature_verifier: V, root_deriver: R) -> Self {
        Self {
            signature_verifier,
            root_deriver,
        }
    }
}

const fn as_client_state(client_state: &AnyClientState) -> Result<&ClientState, RouterError> {
    match client_state {
        AnyClientState::Tendermint(client_state) => Ok(client_state),
        other => Err(RouterError::MismatchedClientState {
            expected: ClientType::Tendermint,
            found: other.client_type(),
        }),
    }
}

const fn as_consensus_state(
    consensus_state: &AnyConsensusState,
) -> Result<&ConsensusState, RouterError> {
    match consensus_state {
        AnyConsensusState::Tendermint(consensus_state) => Ok(consensus_state),
        other => Err(RouterError::MismatchedConsensusState {
            expected: ClientType::Tendermint,
            found: other.client_type(),
        }),
    }
}

fn stored_consensus_state<'a>(
    ctx: &ClientContext<'a>,
    height: Height,
) -> Result<&'a ConsensusState, RouterError> {
    as_consensus_state(ctx.consensus_state(height)?)
}

fn neighbour(
    neighbour: Option<(Height, &AnyConsensusState)>,
) -> Result<Option<&ConsensusState>, RouterError> {
    neighbour
        .map(|(_, state)| as_consensus_state(state))
        .transpose()
}

const fn mismatched_message(message: &AnyClientMessage) -> RouterError {
    RouterError::MismatchedClientMessage {
        expected: ClientType::Tendermint,
        found: message.client_type(),
    }
}

impl<V, R> ClientVerifier for TendermintVerifier<V, R>
where
    V: SignatureVerifier,
    R: RootDeriver,
{
    fn validate(
        &self,
        client_state: &AnyClientState,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), RouterError> {
        as_client_state(client_state)?.validate()?;
        as_consensus_state(consensus_state)?.validate()?;
        Ok(())
    }

    fn verify_client_message(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<(), RouterError> {
        let client_state = as_client_state(ctx.client_state)?;
        // a frozen client rejects before any trusted state is looked up
        client_state.ensure_not_frozen()?;

        match message {
            AnyClientMessage::TendermintHeader(header) => {
                let trusted = stored_consensus_state(ctx, header.trusted_height)?;
                verify::verify_header(
                    client_state,
                    trusted,
                    header,
                    ctx.now,
                    &self.signature_verifier,
                )?;
            }
            AnyClientMessage::TendermintMisbehaviour(evidence) => {
                let trusted_1 = stored_consensus_state(ctx, evidence.header_1.trusted_height)?;
                let trusted_2 = stored_consensus_state(ctx, evidence.header_2.trusted_height)?;
                misbehaviour::verify_misbehaviour(
                    client_state,
                    evidence,
                    trusted_1,
                    trusted_2,
                    ctx.now,
                    &self.signature_verifier,
                )?;
            }
            other => return Err(mismatched_message(other)),
        }

        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<Option<Height>, RouterError> {
        match message {
            AnyClientMessage::TendermintHeader(header) => {
                let existing = ctx
                    .consensus_states
                    .consensus_state(ctx.client_id, header.height())
                    .map(as_consensus_state)
                    .transpose()?;
                let prev = neighbour(
                    ctx.consensus_states
                        .prev_consensus_state(ctx.client_id, header.height()),
                )?;
                let next = neighbour(
                    ctx.consensus_states
                        .next_consensus_state(ctx.client_id, header.height()),
                )?;

                Ok(misbehaviour::check_for_misbehaviour_on_update(
                    header,
                    existing,
                    prev,
                    next,
                    &self.root_deriver,
                )?)
            }
            AnyClientMessage::TendermintMisbehaviour(evidence) => {
                Ok(Some(misbehaviour::check_for_misbehaviour(evidence)?))
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
            AnyClientMessage::TendermintHeader(header) => header,
            AnyClientMessage::TendermintMisbehaviour(_) => {
                return Err(RouterError::UnexpectedClientMessage {
                    reason: "misbehaviour does not update state".to_string(),
                })
            }
            other => return Err(mismatched_message(other)),
        };

        let (height, new_consensus_state, new_client_state) =
            update::update_consensus_state(client_state.clone(), header, &self.root_deriver)?;

        Ok(StateUpdate {
            client_state: AnyClientState::Tendermint(
                new_client_state.unwrap_or_else(|| client_state.clone()),
            ),
            consensus_state: Some((height, AnyConsensusState::Tendermint(new_consensus_state))),
        })
    }

    fn update_state_on_misbehaviour(
        &self,
        client_state: &AnyClientState,
        freeze_height: Height,
    ) -> Result<AnyClientState, RouterError> {
        let client_state = as_client_state(client_state)?.clone();
        Ok(AnyClientState::Tendermint(
            misbehaviour::update_state_on_misbehaviour(client_state, freeze_height),
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
        client_state.ensure_not_frozen()?;
        let consensus_state = stored_consensus_state(ctx, proof_height)?;

        membership::verify_membership(
            client_state,
            consensus_state,
            proof_height,
            proof,
            path,
            value,
        )?;
        Ok(None)
    }

    fn verify_non_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
    ) -> Result<Option<AnyClientState>, RouterError> {
        let client_state = as_client_state(ctx.client_state)?;
        client_state.ensure_not_frozen()?;
        let consensus_state = stored_consensus_state(ctx, proof_height)?;

        membership::verify_non_membership(
            client_state,
            consensus_state,
            proof_height,
            proof,
            path,
        )?;
        Ok(None)
    }

    fn status(&self, ctx: &ClientContext<'_>) -> Result<ClientStatus, RouterError> {
        let client_state = as_client_state(ctx.client_state)?;
        if client_state.is_frozen() {
            return Ok(ClientStatus::Frozen);
        }

        // A client without a consensus state at its latest height cannot verify anything
        let Some(latest) = ctx
            .consensus_states
            .consensus_state(ctx.client_id, client_state.latest_height)
        else {
            return Ok(ClientStatus::Expired);
        };

        Ok(client_state.status(as_consensus_state(latest)?, ctx.now))
    }
}
