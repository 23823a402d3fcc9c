//! Membership and non-membership statements.
//!
//! A solo machine proves a key-value pair by signing it at the current sequence. The proof is a
//! protobuf [`TimestampedSignature`] and the path is the protobuf encoding of the [`MerklePath`] key segments.

use ibc_light_commitment::{merkle::encode_path, MerklePath};
use ibc_light_utils::ensure;
use prost::Message;

use crate::{
    client_state::ClientState,
    error::SoloMachineError,
    sign_bytes::{DataType, TimestampedSignature},
    verify::{verify_solo_machine_update, SignedData},
};

/// Verifies that `value` is stored at `path` and returns the advanced client state
/// # Errors
/// Returns an error if the proof cannot be decoded or the statement fails verification
pub fn verify_membership(
    client_state: &ClientState,
    sequence: u64,
    proof: &[u8],
    path: &MerklePath,
    value: &[u8],
) -> Result<ClientState, SoloMachineError> {
    ensure!(
        !value.is_empty(),
        SoloMachineError::InvalidProof {
            reason: "membership value cannot be empty".to_string()
        }
    );
    verify_statement(
        client_state,
        sequence,
        proof,
        path,
        DataType::Membership,
        value,
    )
}

/// Verifies that nothing is stored at `path` and returns the advanced client state
/// # Errors
/// Returns an error if the proof cannot be decoded or the statement fails verification
pub fn verify_non_membership(
    client_state: &ClientState,
    sequence: u64,
    proof: &[u8],
    path: &MerklePath,
) -> Result<ClientState, SoloMachineError> {
    verify_statement(
        client_state,
        sequence,
        proof,
        path,
        DataType::NonMembership,
        &[],
    )
}

fn verify_statement(
    client_state: &ClientState,
    sequence: u64,
    proof: &[u8],
    path: &MerklePath,
    data_type: DataType,
    data: &[u8],
) -> Result<ClientState, SoloMachineError> {
    client_state.ensure_not_frozen()?;

    let invalid = |reason: String| SoloMachineError::InvalidProof { reason };
    ensure!(!path.key_path.is_empty(), invalid("path cannot be empty".to_string()));
    let proof = TimestampedSignature::decode(proof).map_err(|e| invalid(e.to_string()))?;
    ensure!(
        !proof.signature_data.is_empty(),
        invalid("proof carries no signature".to_string())
    );

    let signed_data = SignedData {
        sequence,
        timestamp: proof.timestamp,
        diversifier: client_state.consensus_state.diversifier.clone(),
        data_type,
        path: encode_path(path),
        data: data.to_vec(),
        signature: proof.signature_data,
        public_key: client_state.consensus_state.public_key.clone(),
    };
    verify_solo_machine_update(client_state, &signed_data)
}
