//! This module defines [`ConsensusState`].

use ibc_light_commitment::CommitmentRoot;
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::TendermintClientError;

/// Length of a SHA-256 digest
pub const HASH_LENGTH: usize = 32;

/// The consensus state of the tendermint light client at a verified height
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    /// Block time of the verified header
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Commitment root proofs are verified against
    #[serde(with = "ibc_light_commitment::commitment::base64_root")]
    pub root: CommitmentRoot,
    /// Hash of the validator set expected to sign the next block
    #[serde(with = "ibc_light_utils::serde::base64")]
    pub next_validators_hash: Vec<u8>,
}

impl ConsensusState {
    /// Performs the stateless checks, in order: root non-empty, next validators hash of digest
    /// length, timestamp strictly after the unix epoch
    /// # Errors
    /// Returns [`TendermintClientError::InvalidConsensusState`] on the first failing check
    pub fn validate(&self) -> Result<(), TendermintClientError> {
        ensure!(
            !self.root.as_bytes().is_empty(),
            TendermintClientError::InvalidConsensusState {
                reason: "root cannot be empty".to_string(),
            }
        );
        ensure!(
            self.next_validators_hash.len() == HASH_LENGTH,
            TendermintClientError::InvalidConsensusState {
                reason: format!(
                    "next validators hash must be {HASH_LENGTH} bytes, found {}",
                    self.next_validators_hash.len()
                ),
            }
        );
        ensure!(
            self.timestamp.unix_timestamp_nanos() > 0,
            TendermintClientError::InvalidConsensusState {
                reason: format!("timestamp must be after the unix epoch, found {}", self.timestamp),
            }
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use time::macros::datetime;

    use super::*;

    fn valid() -> ConsensusState {
        ConsensusState {
            timestamp: datetime!(2024-01-01 00:00 UTC),
            root: CommitmentRoot::from_bytes(b"app hash"),
            next_validators_hash: vec![7; HASH_LENGTH],
        }
    }

    #[test]
    fn valid_consensus_state() {
        assert_eq!(valid().validate(), Ok(()));
        // validation is pure
        assert_eq!(valid().validate(), valid().validate());
    }

    #[rstest]
    #[case::empty_root(ConsensusState { root: CommitmentRoot::from_bytes(&[]), ..valid() }, "root")]
    #[case::short_hash(ConsensusState { next_validators_hash: vec![7; 20], ..valid() }, "32 bytes")]
    #[case::empty_hash(ConsensusState { next_validators_hash: vec![], ..valid() }, "32 bytes")]
    #[case::zero_timestamp(ConsensusState { timestamp: OffsetDateTime::UNIX_EPOCH, ..valid() }, "unix epoch")]
    #[case::negative_timestamp(ConsensusState { timestamp: datetime!(1969-12-31 23:59 UTC), ..valid() }, "unix epoch")]
    fn invalid_consensus_state(#[case] state: ConsensusState, #[case] expected: &str) {
        let Err(TendermintClientError::InvalidConsensusState { reason }) = state.validate() else {
            panic!("expected invalid consensus state");
        };
        assert!(reason.contains(expected), "{reason}");
    }

    #[test]
    fn root_is_checked_first() {
        let state = ConsensusState {
            timestamp: OffsetDateTime::UNIX_EPOCH,
            root: CommitmentRoot::from_bytes(&[]),
            next_validators_hash: vec![],
        };
        let Err(TendermintClientError::InvalidConsensusState { reason }) = state.validate() else {
            panic!("expected invalid consensus state");
        };
        assert!(reason.contains("root"));
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_value(valid()).unwrap();
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(serde_json::from_value::<ConsensusState>(json).unwrap(), valid());
    }
}
