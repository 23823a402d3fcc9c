//! Membership and non-membership verification of [`MerkleProof`]s against a trusted root.
//!
//! The root committed by the outermost proof layer is compared to the trusted root in constant
//! time before the proof is verified layer by layer.

use ibc_core_commitment_types::proto::ics23::HostFunctionsManager;
use ibc_light_utils::ensure;
use ics23::{calculate_existence_root, commitment_proof::Proof, ExistenceProof};
use subtle::ConstantTimeEq;

use crate::{
    commitment::CommitmentRoot,
    error::CommitmentError,
    merkle::{MerklePath, MerkleProof},
    specs::ProofSpecs,
};

/// Verifies that `value` is stored at `path` under `root`
/// # Errors
/// Returns an error if the root is empty, the proof commits to another root or does not verify
pub fn verify_membership(
    root: &CommitmentRoot,
    specs: &ProofSpecs,
    proof: &MerkleProof,
    path: &MerklePath,
    value: &[u8],
) -> Result<(), CommitmentError> {
    ensure_committed_root(root, proof)?;

    proof
        .verify_membership::<HostFunctionsManager>(
            specs.as_ibc(),
            root.clone().into(),
            path.clone(),
            value.to_vec(),
            0,
        )
        .map_err(|e| CommitmentError::VerificationFailed {
            reason: e.to_string(),
        })
}

/// Verifies that nothing is stored at `path` under `root`
/// # Errors
/// Returns an error if the root is empty, the proof commits to another root or does not verify
pub fn verify_non_membership(
    root: &CommitmentRoot,
    specs: &ProofSpecs,
    proof: &MerkleProof,
    path: &MerklePath,
) -> Result<(), CommitmentError> {
    ensure_committed_root(root, proof)?;

    proof
        .verify_non_membership::<HostFunctionsManager>(specs.as_ibc(), root.clone().into(), path.clone())
        .map_err(|e| CommitmentError::VerificationFailed {
            reason: e.to_string(),
        })
}

fn ensure_committed_root(root: &CommitmentRoot, proof: &MerkleProof) -> Result<(), CommitmentError> {
    ensure!(!root.as_bytes().is_empty(), CommitmentError::EmptyCommitmentRoot);

    let committed = outermost_root(proof)?;
    ensure!(
        bool::from(root.as_bytes().ct_eq(&committed)),
        CommitmentError::RootMismatch {
            expected: hex::encode(root.as_bytes()),
            found: hex::encode(&committed),
        }
    );
    tracing::trace!(root = %hex::encode(&committed), "proof commits to the trusted root");

    Ok(())
}

/// The root the last proof layer hashes up to. A non-existence proof commits through either
/// of its neighbours.
fn outermost_root(proof: &MerkleProof) -> Result<Vec<u8>, CommitmentError> {
    let layer = proof.proofs.last().ok_or(CommitmentError::EmptyMerkleProof)?;

    let existence: &ExistenceProof = match &layer.proof {
        Some(Proof::Exist(existence)) => existence,
        Some(Proof::Nonexist(non_existence)) => non_existence
            .left
            .as_ref()
            .or(non_existence.right.as_ref())
            .ok_or_else(|| CommitmentError::InvalidMerkleProof {
                reason: "non-existence proof has neither neighbour".to_string(),
            })?,
        _ => {
            return Err(CommitmentError::InvalidMerkleProof {
                reason: "unsupported proof type".to_string(),
            })
        }
    };

    calculate_existence_root::<HostFunctionsManager>(existence).map_err(|e| {
        CommitmentError::InvalidMerkleProof {
            reason: e.to_string(),
        }
    })
}
