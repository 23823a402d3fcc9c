//! The [`ClientVerifier`] capability set implemented by every client variant.

use ibc_light_client_types::{store::ConsensusStateStore, ClientId, ClientStatus, Height};
use ibc_light_commitment::MerklePath;
use time::OffsetDateTime;

use crate::{
    any::{AnyClientMessage, AnyClientState, AnyConsensusState},
    error::RouterError,
};

/// Everything a verifier may read about the client it verifies for
#[derive(Clone, Copy)]
pub struct ClientContext<'a> {
    /// The client being verified
    pub client_id: &'a ClientId,
    /// The stored client state
    pub client_state: &'a AnyClientState,
    /// The consensus states stored for the client
    pub consensus_states: &'a dyn ConsensusStateStore<ConsensusState = AnyConsensusState>,
    /// The host time verification is performed at
    pub now: OffsetDateTime,
}

impl<'a> ClientContext<'a> {
    /// The consensus state stored at exactly `height`
    /// # Errors
    /// Returns [`RouterError::ConsensusStateNotFound`] if nothing is stored at `height`
    pub fn consensus_state(&self, height: Height) -> Result<&'a AnyConsensusState, RouterError> {
        self.consensus_states
            .consensus_state(self.client_id, height)
            .ok_or_else(|| RouterError::ConsensusStateNotFound {
                client_id: self.client_id.clone(),
                height,
            })
    }
}

/// The state delta of an accepted client message
#[derive(Clone, Debug, PartialEq)]
pub struct StateUpdate {
    /// The new client state, equal to the stored one if nothing changed
    pub client_state: AnyClientState,
    /// The consensus state to store, with its height
    pub consensus_state: Option<(Height, AnyConsensusState)>,
}

/// The fixed set of operations every light client variant provides.
///
/// Implementations are stateless with respect to the client: all state is passed in through
/// [`ClientContext`] and every state change is returned to the caller.
pub trait ClientVerifier {
    /// Checks a client state and its initial consensus state before the client is created
    /// # Errors
    /// Returns an error if either state is invalid or belongs to another client type
    fn validate(
        &self,
        client_state: &AnyClientState,
        consensus_state: &AnyConsensusState,
    ) -> Result<(), RouterError>;

    /// Verifies a header or misbehaviour evidence against the trusted state
    /// # Errors
    /// Returns the verification failure
    fn verify_client_message(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<(), RouterError>;

    /// Checks a verified message for misbehaviour, returning the height to freeze at
    /// # Errors
    /// Returns an error if the message cannot be evaluated
    fn check_for_misbehaviour(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<Option<Height>, RouterError>;

    /// Computes the state delta of a verified header
    /// # Errors
    /// Returns an error if the message is not a header
    fn update_state(
        &self,
        ctx: &ClientContext<'_>,
        message: &AnyClientMessage,
    ) -> Result<StateUpdate, RouterError>;

    /// Freezes the client at `freeze_height`
    /// # Errors
    /// Returns an error if the client state belongs to another client type
    fn update_state_on_misbehaviour(
        &self,
        client_state: &AnyClientState,
        freeze_height: Height,
    ) -> Result<AnyClientState, RouterError>;

    /// Verifies that `value` is stored at `path` at `proof_height`.
    ///
    /// Returns the new client state if the verification consumed client state, as solo machine
    /// statements do.
    /// # Errors
    /// Returns the verification failure
    fn verify_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
        value: &[u8],
    ) -> Result<Option<AnyClientState>, RouterError>;

    /// Verifies that nothing is stored at `path` at `proof_height`
    /// # Errors
    /// Returns the verification failure
    fn verify_non_membership(
        &self,
        ctx: &ClientContext<'_>,
        proof_height: Height,
        proof: &[u8],
        path: &MerklePath,
    ) -> Result<Option<AnyClientState>, RouterError>;

    /// The status of the client at `ctx.now`
    /// # Errors
    /// Returns an error if the client state belongs to another client type
    fn status(&self, ctx: &ClientContext<'_>) -> Result<ClientStatus, RouterError>;
}
