//! Membership and non-membership verification against a stored consensus state.

use ibc_light_client_types::Height;
use ibc_light_commitment::{merkle::decode_proof, CommitmentError, MerklePath, MerkleProof};
use ibc_light_utils::ensure;

use crate::{
    client_state::ClientState, consensus_state::ConsensusState, error::TendermintClientError,
};

/// Verifies that `value` is committed at `path` in the consensus state at `proof_height`
/// # Errors
/// Returns an error if the client is frozen, the height is above the latest height, or the
/// proof does not verify
pub fn verify_membership(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    proof_height: Height,
    proof: &[u8],
    path: &MerklePath,
    value: &[u8],
) -> Result<(), TendermintClientError> {
    let proof = check_proof_context(client_state, consensus_state, proof_height, proof)?;

    ibc_light_commitment::verify_membership(
        &consensus_state.root,
        &client_state.proof_specs,
        &proof,
        path,
        value,
    )?;

    Ok(())
}

/// Verifies that nothing is committed at `path` in the consensus state at `proof_height`
/// # Errors
/// Returns an error if the client is frozen, the height is above the latest height, or the
/// proof does not verify
pub fn verify_non_membership(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    proof_height: Height,
    proof: &[u8],
    path: &MerklePath,
) -> Result<(), TendermintClientError> {
    let proof = check_proof_context(client_state, consensus_state, proof_height, proof)?;

    ibc_light_commitment::verify_non_membership(
        &consensus_state.root,
        &client_state.proof_specs,
        &proof,
        path,
    )?;

    Ok(())
}

fn check_proof_context(
    client_state: &ClientState,
    consensus_state: &ConsensusState,
    proof_height: Height,
    proof: &[u8],
) -> Result<MerkleProof, TendermintClientError> {
    client_state.ensure_not_frozen()?;
    ensure!(
        proof_height <= client_state.latest_height,
        TendermintClientError::ProofHeightTooHigh {
            proof_height,
            latest_height: client_state.latest_height,
        }
    );

    ensure!(
        !consensus_state.root.as_bytes().is_empty(),
        CommitmentError::EmptyCommitmentRoot.into()
    );

    Ok(decode_proof(proof)?)
}
