//! This module defines [`ClientRouter`].

use std::collections::BTreeMap;

use ibc_light_client_types::{ClientStatus, ClientType, Height};
use ibc_light_commitment::MerklePath;
use ibc_light_utils::ensure;

use crate::{
    any::{AnyClientMessage, AnyClientState, AnyConsensusState},
    config::ClientParams,
    error::RouterError,
    solomachine::SoloMachineVerifier,
    tendermint::DefaultTendermintVerifier,
    verifier::{ClientContext, ClientVerifier, StateUpdate},
};

/// The result of an accepted client message
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// A header was verified, persist the state delta
    Updated(StateUpdate),
    /// Misbehaviour was detected, persist the frozen client state
    Frozen {
        /// The frozen client state
        client_state: AnyClientState,
        /// The height the client was frozen at
        freeze_height: Height,
    },
}

/// Dispatches client operations to the verifier registered for the client type.
///
/// The map is built explicitly by the host. Only client types allowed by the [`ClientParams`]
/// can be registered and routed to.
pub struct ClientRouter {
    params: ClientParams,
    verifiers: BTreeMap<ClientType, Box<dyn ClientVerifier>>,
}

impl ClientRouter {
    /// Create a router without verifiers
    #[must_use]
    pub const fn new(params: ClientParams) -> Self {
        Self {
            params,
            verifiers: BTreeMap::new(),
        }
    }

    /// Create a router with the default verifier of every allowed client type
    #[must_use]
    pub fn from_params(params: ClientParams) -> Self {
        let mut verifiers: BTreeMap<ClientType, Box<dyn ClientVerifier>> = BTreeMap::new();
        for client_type in &params.allowed_clients {
            let verifier: Box<dyn ClientVerifier> = match client_type {
                ClientType::Tendermint => Box::new(DefaultTendermintVerifier::default()),
                ClientType::SoloMachine => Box::new(SoloMachineVerifier),
            };
            verifiers.insert(*client_type, verifier);
        }

        Self { params, verifiers }
    }

    /// Registers `verifier` for `client_type`, replacing any previous one
    /// # Errors
    /// Returns [`RouterError::ClientTypeNotAllowed`] if the params do not allow the client type
    pub fn register(
        &mut self,
        client_type: ClientType,
        verifier: Box<dyn ClientVerifier>,
    ) -> Result<(), RouterError> {
        ensure!(
            self.params.is_allowed(client_type),
            RouterError::ClientTypeNotAllowed(client_type)
        );
        self.verifiers.insert(client_type, verifier);
        Ok(())
    }

    /// The params the router was created with
    #[must_use]
    pub const fn params(&self) -> &ClientParams {
        &self.params
    }

    /// The verifier of `client_type`
    /// # Errors
    /// Returns an error if the client type is not allowed or has no verifier
    pub fn verifier(&self, client_type: ClientType) -> Result<&dyn ClientVerifier, RouterError> {
        ensure!(
            self.params.is_allowed(client_type),
            RouterError::ClientTypeNotAllowed(client_type)
        );
        self.verifiers
            .get(&client_type)
            .map(|verifier| verifier.as_ref())
            .ok_or(RouterError::VerifierNotRegistered(client_type))
    }

    fn route(&self, ctx: &ClientContext<'_>) -> Result<&dyn ClientVerifier, RouterError> {
        let client_type = ctx.client_state.client_type();
        if let Some(id_type) = ctx.client_id.client_type() {
            ensure!(
                id_type == client_type,
                RouterError::ClientIdMismatch {
                    client_id: ctx.client_id.clone(),
                    client_type,
                }
            );
        }

        tracing::debug!(client_id = %ctx.client_id, %client_type, "routing client operation");
        self.verifier(client_type)
    }

    /// Validates the initial states of a new client
    /// # Errors
    /// Returns an error if the client type is not routable or either state is invalid
    pub fn validate(
        &self,
        client_state: &AnyClientState,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), RouterError> {
        self.verifier(client_state.client_type())?
            .validate(client_state, consensus_state)
    }

    /// The status of the client
    /// # Errors
    /// Returns an error if the client type is not routable
    pub fn status(&self, ctx: &ClientContext<'_>) -> Result<ClientStatus, RouterError> {
        self.route(ctx)?.status(ctx)
    }

    /// Verifies a client message and computes the resulting state change: the frozen client
    /// state if the message proves misbehaviour, the update delta otherwise.
    /// # Errors
    /// Returns an error if the message is not routable or fails verification. Nothing is to be
    /// persisted in that case.
    pub fn handle_client_message(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<UpdateOutcome, RouterError> {
        let verifier = self.route(ctx)?;
        let client_type = ctx.client_state.client_type();
        ensure!(
            message.client_type() == client_type,
            RouterError::MismatchedClientMessage {
                expected: client_type,
                found: message.client_type(),
            }
        );

        if let Err(err) = verifier.verify_client_message(ctx, message) {
            tracing::debug!(
                client_id = %ctx.client_id,
                %client_type,
                %err,
                "client message rejected"
            );
            return Err(err);
        }

        if let Some(freeze_height) = verifier.check_for_misbehaviour(ctx, message)? {
            let client_state =
                verifier.update_state_on_misbehaviour(ctx.client_state, freeze_height)?;
            tracing::warn!(
                client_id = %ctx.client_id,
                %client_type,
                height = %freeze_height,
                "misbehaviour detected, client frozen"
            );
            return Ok(UpdateOutcome::Frozen {
                client_state,
                freeze_height,
            });
        }

        let update = verifier.update_state(ctx, message)?;
        tracing::info!(
            client_id = %ctx.client_id,
            %client_type,
            height = %update.client_state.latest_height(),
            "client updated"
        );
        Ok(UpdateOutcome::Updated(update))
    }

    /// Verifies a membership proof, returning the new client state if the proof consumed state
    /// # Errors
    /// Returns an error if the client type is not routable or the proof is invalid
    pub fn verify_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
        value: &[u8],
    ) -> Result<Option<AnyClientState>, RouterError> {
        self.route(ctx)?
            .verify_membership(ctx, proof_height, proof, path, value)
            .inspect_err(|err| {
                tracing::debug!(client_id = %ctx.client_id, %err, "membership proof rejected");
            })
    }

    /// Verifies a non-membership proof, returning the new client state if the proof consumed
    /// state
    /// # Errors
    /// Returns an error if the client type is not routable or the proof is invalid
    pub fn verify_non_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
    ) -> Result<Option<AnyClientState>, RouterError> {
        self.route(ctx)?
            .verify_non_membership(ctx, proof_height, proof, path)
            .inspect_err(|err| {
                tracing::debug!(client_id = %ctx.client_id, %err, "non-membership proof rejected");
            })
    }
}
