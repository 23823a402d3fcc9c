//! Merkle paths and proofs, and their byte encodings.

use ibc_core_host_types::path::PathBytes;
use ibc_light_utils::ensure;
use ibc_proto::{ibc::core::commitment::v1::MerkleProof as RawMerkleProof, Protobuf};
use prost::Message;

use crate::error::CommitmentError;

pub use ibc_core_commitment_types::merkle::{MerklePath, MerkleProof};

/// Builds a path from its key segments, outermost store first
pub fn merkle_path<I, S>(segments: I) -> MerklePath
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    MerklePath::new(
        segments
            .into_iter()
            .map(|segment| PathBytes::from_bytes(segment.as_ref().to_vec()))
            .collect(),
    )
}

/// Prepends the store prefix to `path`
/// # Errors
/// Returns an error if the prefix or the path is empty
pub fn apply_prefix(prefix: &[u8], path: &[u8]) -> Result<MerklePath, CommitmentError> {
    ensure!(!prefix.is_empty(), CommitmentError::EmptyCommitmentPrefix);
    ensure!(!path.is_empty(), CommitmentError::EmptyMerklePath);

    Ok(merkle_path([prefix, path]))
}

/// Wire form of a path whose segments are raw bytes
#[derive(Clone, PartialEq, Message)]
struct RawBytesPath {
    #[prost(bytes = "vec", repeated, tag = "1")]
    key_path: Vec<Vec<u8>>,
}

/// Protobuf encoding of `path` as `repeated bytes key_path = 1`
#[must_use]
pub fn encode_path(path: &MerklePath) -> Vec<u8> {
    RawBytesPath {
        key_path: path
            .key_path
            .iter()
            .map(|segment| AsRef::<[u8]>::as_ref(segment).to_vec())
            .collect(),
    }
    .encode_to_vec()
}

/// Decodes a protobuf encoded [`MerkleProof`]
/// # Errors
/// Returns an error if the bytes are empty, not a valid encoding, or carry no proofs
pub fn decode_proof(bytes: &[u8]) -> Result<MerkleProof, CommitmentError> {
    ensure!(!bytes.is_empty(), CommitmentError::EmptyMerkleProof);
    let proof = <MerkleProof as Protobuf<RawMerkleProof>>::decode_vec(bytes)
        .map_err(|e| CommitmentError::Decode(e.to_string()))?;
    ensure!(!proof.proofs.is_empty(), CommitmentError::EmptyMerkleProof);
    Ok(proof)
}

/// Protobuf encoding of `proof`
#[must_use]
pub fn encode_proof(proof: &MerkleProof) -> Vec<u8> {
    <MerkleProof as Protobuf<RawMerkleProof>>::encode_vec(proof.clone())
}
