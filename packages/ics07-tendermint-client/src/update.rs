//! Tendermint light client update logic

use ibc_light_client_types::Height;
use ibc_light_commitment::CommitmentRoot;

use crate::{
    client_state::ClientState, consensus_state::ConsensusState, error::TendermintClientError,
    header::Header,
};

/// Derives the commitment root stored for a verified header
pub trait RootDeriver {
    /// The root proofs at the header's height are verified against
    fn derive_root(&self, header: &Header) -> CommitmentRoot;
}

/// Uses the header's app hash as the commitment root
#[derive(Clone, Copy, Debug, Default)]
pub struct AppHashRoot;

impl RootDeriver for AppHashRoot {
    fn derive_root(&self, header: &Header) -> CommitmentRoot {
        CommitmentRoot::from_bytes(header.app_hash())
    }
}

/// The consensus state a verified header commits to
/// # Errors
/// Returns an error if the resulting consensus state is invalid, e.g. an empty root
pub fn header_consensus_state<R: RootDeriver>(
    header: &Header,
    root_deriver: &R,
) -> Result<ConsensusState, TendermintClientError> {
    let consensus_state = ConsensusState {
        timestamp: header.time()?,
        root: root_deriver.derive_root(header),
        next_validators_hash: header.next_validators_hash().as_bytes().to_vec(),
    };
    consensus_state.validate()?;
    Ok(consensus_state)
}

/// Updates the consensus state with a verified header
/// Returns (`new_height`, `new_consensus_state`, `optional_new_client_state`)
/// # Errors
/// Returns an error if the resulting consensus state is invalid
pub fn update_consensus_state<R: RootDeriver>(
    current_client_state: ClientState,
    header: &Header,
    root_deriver: &R,
) -> Result<(Height, ConsensusState, Option<ClientState>), TendermintClientError> {
    let new_consensus_state = header_consensus_state(header, root_deriver)?;

    // Only move the latest height forward, older heights can be filled in
    let height = header.height();
    let height_has_progressed = height > current_client_state.latest_height;
    let new_client_state = height_has_progressed.then(|| ClientState {
        latest_height: height,
        ..current_client_state
    });

    Ok((height, new_consensus_state, new_client_state))
}
