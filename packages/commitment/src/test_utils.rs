//! Builders for Tendermint simple merkle trees and ICS-23 proofs over them.

use std::collections::BTreeMap;

use ics23::{
    commitment_proof::Proof, CommitmentProof, ExistenceProof, HashOp, InnerOp,
    NonExistenceProof,
};
use sha2::{Digest, Sha256};
use tendermint::merkle::{simple_hash_from_byte_vectors, Hash};

use crate::{
    merkle::{merkle_path, MerklePath, MerkleProof},
    CommitmentRoot,
};

/// A sorted key-value store committed as a simple merkle tree, matching
/// [`ics23::tendermint_spec`]
#[derive(Clone, Debug, Default)]
pub struct SimpleTree {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl SimpleTree {
    /// Create a tree from key-value pairs
    pub fn new<K: Into<Vec<u8>>, V: Into<Vec<u8>>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The merkle root of the tree
    #[must_use]
    pub fn root(&self) -> Hash {
        simple_hash_from_byte_vectors::<Sha256>(&self.leaves())
    }

    /// An existence proof for `key`, if present
    #[must_use]
    pub fn existence_proof(&self, key: &[u8]) -> Option<ExistenceProof> {
        let index = self.entries.keys().position(|k| k == key)?;
        Some(self.existence_proof_at(index))
    }

    /// A non-existence proof for `key`, if absent
    #[must_use]
    pub fn non_existence_proof(&self, key: &[u8]) -> Option<NonExistenceProof> {
        if self.entries.contains_key(key) {
            return None;
        }
        let right_index = self.entries.keys().position(|k| k.as_slice() > key);
        let left = match right_index {
            Some(0) => None,
            Some(i) => Some(self.existence_proof_at(i - 1)),
            None => self.entries.len().checked_sub(1).map(|i| self.existence_proof_at(i)),
        };
        let right = right_index.map(|i| self.existence_proof_at(i));

        Some(NonExistenceProof {
            key: key.to_vec(),
            left,
            right,
        })
    }

    /// A membership [`CommitmentProof`] for `key`
    #[must_use]
    pub fn membership_proof(&self, key: &[u8]) -> Option<CommitmentProof> {
        self.existence_proof(key).map(|p| CommitmentProof {
            proof: Some(Proof::Exist(p)),
        })
    }

    /// A non-membership [`CommitmentProof`] for `key`
    #[must_use]
    pub fn non_membership_proof(&self, key: &[u8]) -> Option<CommitmentProof> {
        self.non_existence_proof(key).map(|p| CommitmentProof {
            proof: Some(Proof::Nonexist(p)),
        })
    }

    fn leaves(&self) -> Vec<Vec<u8>> {
        self.entries.iter().map(|(k, v)| leaf_data(k, v)).collect()
    }

    fn existence_proof_at(&self, index: usize) -> ExistenceProof {
        let (key, value) = self
            .entries
            .iter()
            .nth(index)
            .expect("index is within the tree");

        ExistenceProof {
            key: key.clone(),
            value: value.clone(),
            leaf: ics23::tendermint_spec().leaf_spec,
            path: inner_path(&self.leaves(), index),
        }
    }
}

/// A store of named substores, each committed as a [`SimpleTree`], as laid out by a Cosmos SDK
/// multistore
#[derive(Clone, Debug, Default)]
pub struct MultiStore {
    stores: BTreeMap<Vec<u8>, SimpleTree>,
}

impl MultiStore {
    /// Create a multistore with a single substore
    pub fn with_store<K: Into<Vec<u8>>, V: Into<Vec<u8>>>(
        name: &[u8],
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut store = Self::default();
        store.insert_store(name, entries);
        store
    }

    /// Add or replace a substore
    pub fn insert_store<K: Into<Vec<u8>>, V: Into<Vec<u8>>>(
        &mut self,
        name: &[u8],
        entries: impl IntoIterator<Item = (K, V)>,
    ) {
        self.stores.insert(name.to_vec(), SimpleTree::new(entries));
    }

    /// The root committed by the multistore
    #[must_use]
    pub fn root(&self) -> CommitmentRoot {
        CommitmentRoot::from_bytes(&self.outer_tree().root())
    }

    /// Membership proof for `key` in substore `name`
    #[must_use]
    pub fn membership_proof(&self, name: &[u8], key: &[u8]) -> Option<MerkleProof> {
        let inner = self.stores.get(name)?.membership_proof(key)?;
        let outer = self.outer_tree().membership_proof(name)?;
        Some(MerkleProof {
            proofs: vec![inner, outer],
        })
    }

    /// Non-membership proof for `key` in substore `name`
    #[must_use]
    pub fn non_membership_proof(&self, name: &[u8], key: &[u8]) -> Option<MerkleProof> {
        let inner = self.stores.get(name)?.non_membership_proof(key)?;
        let outer = self.outer_tree().membership_proof(name)?;
        Some(MerkleProof {
            proofs: vec![inner, outer],
        })
    }

    /// The two segment path of `key` in substore `name`
    #[must_use]
    pub fn path(name: &[u8], key: &[u8]) -> MerklePath {
        merkle_path([name, key])
    }

    fn outer_tree(&self) -> SimpleTree {
        SimpleTree::new(
            self.stores
                .iter()
                .map(|(name, store)| (name.clone(), store.root().to_vec())),
        )
    }
}

/// Leaf preimage under [`ics23::tendermint_spec`]:
/// `varint(len(key)) || key || varint(32) || sha256(value)`
#[must_use]
pub fn leaf_data(key: &[u8], value: &[u8]) -> Vec<u8> {
    let value_hash = Sha256::digest(value);
    let mut data = Vec::with_capacity(key.len() + value_hash.len() + 4);
    prost::encoding::encode_varint(key.len() as u64, &mut data);
    data.extend_from_slice(key);
    prost::encoding::encode_varint(value_hash.len() as u64, &mut data);
    data.extend_from_slice(&value_hash);
    data
}

/// Inner operations from the leaf at `index` up to the root
fn inner_path(leaves: &[Vec<u8>], index: usize) -> Vec<InnerOp> {
    if leaves.len() <= 1 {
        return vec![];
    }

    let (left, right) = leaves.split_at(split_point(leaves.len()));
    if index < left.len() {
        let mut path = inner_path(left, index);
        path.push(InnerOp {
            hash: HashOp::Sha256 as i32,
            prefix: vec![1],
            suffix: simple_hash_from_byte_vectors::<Sha256>(right).to_vec(),
        });
        path
    } else {
        let mut path = inner_path(right, index - left.len());
        let mut prefix = vec![1];
        prefix.extend_from_slice(&simple_hash_from_byte_vectors::<Sha256>(left));
        path.push(InnerOp {
            hash: HashOp::Sha256 as i32,
            prefix,
            suffix: vec![],
        });
        path
    }
}

/// Largest power of two strictly below `length`
const fn split_point(length: usize) -> usize {
    length.next_power_of_two() / 2
}
