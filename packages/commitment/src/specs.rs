//! This module defines [`ProofSpecs`].

use ibc_core_commitment_types::specs::ProofSpecs as IbcProofSpecs;
use ibc_light_utils::ensure;
use ics23::ProofSpec;
use prost::Message;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;

/// The proof specifications of each store layer, innermost store first.
///
/// Serialized as a list of base64 encoded protobuf `ProofSpec`s.
#[derive(Clone, Debug, PartialEq)]
pub struct ProofSpecs(IbcProofSpecs);

impl ProofSpecs {
    /// Proof specs of a Cosmos SDK chain: an IAVL store inside a simple merkle multistore
    #[must_use]
    pub fn cosmos() -> Self {
        Self(IbcProofSpecs::cosmos())
    }

    /// Single layer simple merkle tree specs
    #[must_use]
    pub fn tendermint() -> Self {
        Self(vec![ics23::tendermint_spec()].into())
    }

    /// Create validated specs
    /// # Errors
    /// Returns an error if the list is empty or a spec is incomplete
    pub fn new(specs: Vec<ProofSpec>) -> Result<Self, CommitmentError> {
        let specs = Self(specs.into());
        specs.validate()?;
        Ok(specs)
    }

    /// Checks that the list is non-empty and every spec describes both leaves and inner nodes
    /// # Errors
    /// Returns the first problem found
    pub fn validate(&self) -> Result<(), CommitmentError> {
        let specs = self.to_raw();
        ensure!(!specs.is_empty(), CommitmentError::EmptyProofSpecs);

        for (index, spec) in specs.iter().enumerate() {
            let invalid = |reason: &str| CommitmentError::InvalidProofSpec {
                index,
                reason: reason.to_string(),
            };

            ensure!(spec.leaf_spec.is_some(), invalid("missing leaf spec"));
            let inner = spec
                .inner_spec
                .as_ref()
                .ok_or_else(|| invalid("missing inner spec"))?;
            ensure!(inner.child_size > 0, invalid("child size must be positive"));
            ensure!(
                inner.child_order.len() > 1,
                invalid("inner nodes must have at least two children")
            );
            ensure!(
                spec.max_depth >= 0 && spec.min_depth >= 0,
                invalid("depth bounds must be non-negative")
            );
            ensure!(
                spec.max_depth == 0 || spec.min_depth <= spec.max_depth,
                invalid("min depth exceeds max depth")
            );
        }

        Ok(())
    }

    /// Number of store layers
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_raw().len()
    }

    /// Whether there are no specs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The specs as consumed by [`MerkleProof`](crate::MerkleProof) verification
    #[must_use]
    pub const fn as_ibc(&self) -> &IbcProofSpecs {
        &self.0
    }

    fn to_raw(&self) -> Vec<ProofSpec> {
        self.0.clone().into()
    }
}

impl Serialize for ProofSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<Vec<u8>> = self.to_raw().iter().map(Message::encode_to_vec).collect();
        ibc_light_utils::serde::base64::vec::serialize(&encoded, serializer)
    }
}

impl<'de> Deserialize<'de> for ProofSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded: Vec<Vec<u8>> = ibc_light_utils::serde::base64::vec::deserialize(deserializer)?;
        let specs = encoded
            .iter()
            .map(|bytes| ProofSpec::decode(bytes.as_slice()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(de::Error::custom)?;
        Self::new(specs).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(ProofSpecs::cosmos().validate().is_ok());
        assert!(ProofSpecs::tendermint().validate().is_ok());
        assert_eq!(ProofSpecs::cosmos().len(), 2);
    }

    #[test]
    fn empty_specs_are_rejected() {
        assert_eq!(ProofSpecs::new(vec![]), Err(CommitmentError::EmptyProofSpecs));
    }

    #[rstest]
    #[case::no_inner_spec(|spec: &mut ProofSpec| spec.inner_spec = None)]
    #[case::no_leaf_spec(|spec: &mut ProofSpec| spec.leaf_spec = None)]
    #[case::inverted_depths(|spec: &mut ProofSpec| { spec.min_depth = 5; spec.max_depth = 2; })]
    fn incomplete_spec_is_rejected(#[case] mutate: fn(&mut ProofSpec)) {
        let mut spec = ics23::tendermint_spec();
        mutate(&mut spec);
        assert!(matches!(
            ProofSpecs::new(vec![ics23::iavl_spec(), spec]),
            Err(CommitmentError::InvalidProofSpec { index: 1, .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let specs = ProofSpecs::cosmos();
        let json = serde_json::to_string(&specs).unwrap();
        assert_eq!(serde_json::from_str::<ProofSpecs>(&json).unwrap(), specs);
        assert!(serde_json::from_str::<ProofSpecs>("[]").is_err());
    }
}
