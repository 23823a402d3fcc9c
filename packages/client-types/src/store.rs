//! This module defines the read-only [`ConsensusStateStore`] interface and an in-memory
//! implementation of it.

use std::collections::BTreeMap;

use crate::{ClientId, Height};

/// Read access to the consensus states persisted by the host.
///
/// The verifiers never write through this interface, the caller persists the state deltas
/// returned on a successful update.
pub trait ConsensusStateStore {
    /// The consensus state type stored for a client
    type ConsensusState;

    /// The consensus state stored at exactly `height`
    fn consensus_state(&self, client_id: &ClientId, height: Height)
        -> Option<&Self::ConsensusState>;

    /// The consensus state at the greatest height strictly below `height`
    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Option<(Height, &Self::ConsensusState)>;

    /// The consensus state at the smallest height strictly above `height`
    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Option<(Height, &Self::ConsensusState)>;
}

/// A [`ConsensusStateStore`] backed by ordered maps
#[derive(Clone, Debug)]
pub struct InMemoryConsensusStateStore<CS> {
    states: BTreeMap<ClientId, BTreeMap<Height, CS>>,
}

impl<CS> Default for InMemoryConsensusStateStore<CS> {
    fn default() -> Self {
        Self {
            states: BTreeMap::new(),
        }
    }
}

impl<CS> InMemoryConsensusStateStore<CS> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a consensus state, returning the previous one at that height if any
    pub fn insert(&mut self, client_id: ClientId, height: Height, state: CS) -> Option<CS> {
        self.states
            .entry(client_id)
            .or_default()
            .insert(height, state)
    }
}

impl<CS> ConsensusStateStore for InMemoryConsensusStateStore<CS> {
    type ConsensusState = CS;

    fn consensus_state(&self, client_id: &ClientId, height: Height) -> Option<&CS> {
        self.states.get(client_id)?.get(&height)
    }

    fn prev_consensus_state(&self, client_id: &ClientId, height: Height) -> Option<(Height, &CS)> {
        self.states
            .get(client_id)?
            .range(..height)
            .next_back()
            .map(|(h, cs)| (*h, cs))
    }

    fn next_consensus_state(&self, client_id: &ClientId, height: Height) -> Option<(Height, &CS)> {
        use std::ops::Bound::{Excluded, Unbounded};

        self.states
            .get(client_id)?
            .range((Excluded(height), Unbounded))
            .next()
            .map(|(h, cs)| (*h, cs))
    }
}
