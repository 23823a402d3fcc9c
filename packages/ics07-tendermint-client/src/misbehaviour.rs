//! This module defines [`Misbehaviour`] and the functions to detect and verify it.

use ibc_light_client_types::{ClientId, Height};
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::TendermintClientError,
    header::Header,
    update::{header_consensus_state, RootDeriver},
    verify::{verify_header, SignatureVerifier},
};

/// Evidence of two conflicting headers signed by the tracked chain
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Misbehaviour {
    /// The client the evidence is submitted to
    pub client_id: ClientId,
    /// The header at the greater or equal height
    pub header_1: Header,
    /// The header at the lower or equal height
    pub header_2: Header,
}

impl Misbehaviour {
    /// Stateless checks of the evidence
    /// # Errors
    /// Returns an error if either header is invalid, the headers are from different chains,
    /// out of order, or identical
    pub fn validate_basic(&self, chain_id: &str) -> Result<(), TendermintClientError> {
        let invalid = |reason: String| TendermintClientError::InvalidMisbehaviour { reason };

        self.header_1.validate_basic(chain_id)?;
        self.header_2.validate_basic(chain_id)?;

        let (height_1, height_2) = (self.header_1.height(), self.header_2.height());
        ensure!(
            self.header_1.chain_id() == self.header_2.chain_id(),
            invalid("headers are from different chains".to_string())
        );
        ensure!(
            height_1 >= height_2,
            invalid(format!(
                "header 1 height {height_1} must be at least header 2 height {height_2}"
            ))
        );
        if height_1 == height_2 {
            ensure!(
                self.header_1.block_hash() != self.header_2.block_hash(),
                invalid("headers at the same height have the same block hash".to_string())
            );
        }

        Ok(())
    }

    /// The height the client is frozen at if the headers conflict
    ///
    /// Headers at the same height conflict when their block hashes differ. Headers at different
    /// heights conflict when the higher one is not later in time, the client is then frozen at
    /// the higher height.
    #[must_use]
    pub fn conflict_height(&self) -> Option<Height> {
        let (h1, h2) = (&self.header_1, &self.header_2);
        let (height_1, height_2) = (h1.height(), h2.height());

        if height_1 == height_2 {
            (h1.block_hash() != h2.block_hash()).then_some(height_2)
        } else if height_1 > height_2 {
            (h1.signed_header.header.time <= h2.signed_header.header.time).then_some(height_1)
        } else {
            None
        }
    }
}

/// Verifies both headers of the evidence against their own trusted consensus states
/// # Errors
/// Returns an error if the evidence is malformed or either header fails verification
pub fn verify_misbehaviour<V: SignatureVerifier>(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
    trusted_consensus_state_1: &ConsensusState,
    trusted_consensus_state_2: &ConsensusState,
    now: OffsetDateTime,
    signature_verifier: &V,
) -> Result<(), TendermintClientError> {
    client_state.ensure_not_frozen()?;
    misbehaviour.validate_basic(&client_state.chain_id)?;

    verify_header(
        client_state,
        trusted_consensus_state_1,
        &misbehaviour.header_1,
        now,
        signature_verifier,
    )?;
    verify_header(
        client_state,
        trusted_consensus_state_2,
        &misbehaviour.header_2,
        now,
        signature_verifier,
    )?;

    Ok(())
}

/// Checks verified evidence for a conflict, returning the height to freeze the client at
/// # Errors
/// Returns [`TendermintClientError::MisbehaviourNotDetected`] if the headers do not conflict
pub fn check_for_misbehaviour(misbehaviour: &Misbehaviour) -> Result<Height, TendermintClientError> {
    let freeze_height = misbehaviour
        .conflict_height()
        .ok_or(TendermintClientError::MisbehaviourNotDetected)?;

    tracing::debug!(
        client_id = %misbehaviour.client_id,
        %freeze_height,
        "misbehaviour detected"
    );

    Ok(freeze_height)
}

/// Checks a single verified update header for misbehaviour against the consensus states
/// already stored around its height.
///
/// Returns the height to freeze the client at if a different consensus state is already
/// stored at the header height, or if the header time is not strictly between the times of its
/// stored neighbours.
/// # Errors
/// Returns an error if the header does not produce a valid consensus state or its time is out
/// of range
pub fn check_for_misbehaviour_on_update<R: RootDeriver>(
    header: &Header,
    existing: Option<&ConsensusState>,
    prev: Option<&ConsensusState>,
    next: Option<&ConsensusState>,
    root_deriver: &R,
) -> Result<Option<Height>, TendermintClientError> {
    if let Some(existing) = existing {
        let header_consensus_state = header_consensus_state(header, root_deriver)?;
        // Re-submitting the same header is not misbehaviour
        return Ok((existing != &header_consensus_state).then_some(header.height()));
    }

    let header_time = header.time()?;
    let after_prev = prev.map_or(true, |prev| header_time > prev.timestamp);
    let before_next = next.map_or(true, |next| header_time < next.timestamp);

    Ok((!(after_prev && before_next)).then_some(header.height()))
}

/// Freezes the client at `freeze_height`
#[must_use]
pub fn update_state_on_misbehaviour(client_state: ClientState, freeze_height: Height) -> ClientState {
    client_state.frozen_at(freeze_height)
}
