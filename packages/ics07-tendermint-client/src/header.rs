//! This module defines [`Header`], a tendermint signed header with the validator sets needed to
//! verify it.

use ibc_light_client_types::{identifier::parse_chain_id_epoch, Height};
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};
use tendermint::{
    account,
    block::{signed_header::SignedHeader, Commit, CommitSig},
    chain,
    vote::{self, CanonicalVote},
    Hash, Signature, Time,
};
use tendermint_proto::Protobuf;
use time::OffsetDateTime;

use crate::{
    error::TendermintClientError,
    validator::{self, ValidatorSet},
};

/// A signed block header together with the validator sets needed to verify it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// The block header and the commit signing it
    pub signed_header: SignedHeader,
    /// The validator set that signed the block
    pub validator_set: ValidatorSet,
    /// Height of the consensus state this header is verified against
    pub trusted_height: Height,
    /// The validator set the trusted consensus state committed to as next validators
    pub trusted_next_validator_set: ValidatorSet,
}

impl Header {
    /// Chain the block belongs to
    #[must_use]
    pub fn chain_id(&self) -> &str {
        self.signed_header.header.chain_id.as_str()
    }

    /// Height of the block, in the epoch encoded in the chain id
    #[must_use]
    pub fn height(&self) -> Height {
        Height::new(
            parse_chain_id_epoch(self.chain_id()),
            self.signed_header.header.height.value(),
        )
    }

    /// Block time
    /// # Errors
    /// Returns [`TendermintClientError::InvalidHeader`] if the time is out of range
    pub fn time(&self) -> Result<OffsetDateTime, TendermintClientError> {
        let time = self.signed_header.header.time;
        OffsetDateTime::from_unix_timestamp_nanos(time.unix_timestamp_nanos()).map_err(|e| {
            TendermintClientError::InvalidHeader {
                reason: format!("block time {time}: {e}"),
            }
        })
    }

    /// Application state root after the previous block
    #[must_use]
    pub fn app_hash(&self) -> &[u8] {
        self.signed_header.header.app_hash.as_bytes()
    }

    /// Hash of the validator set for the next block
    #[must_use]
    pub const fn next_validators_hash(&self) -> Hash {
        self.signed_header.header.next_validators_hash
    }

    /// Hash identifying the block
    #[must_use]
    pub fn block_hash(&self) -> Hash {
        self.signed_header.header.hash()
    }

    /// Whether the header directly follows its trusted height
    #[must_use]
    pub fn is_adjacent(&self) -> bool {
        self.trusted_height.increment() == self.height()
    }

    /// Precommits for the block as `(validator, vote time, signature)`. Absent and nil votes
    /// are skipped.
    pub fn block_signatures(&self) -> impl Iterator<Item = (account::Id, Time, Option<&Signature>)> {
        self.signed_header
            .commit
            .signatures
            .iter()
            .filter_map(|sig| match sig {
                CommitSig::BlockIdFlagCommit {
                    validator_address,
                    timestamp,
                    signature,
                } => Some((*validator_address, *timestamp, signature.as_ref())),
                _ => None,
            })
    }

    /// The bytes a validator voting at `timestamp` signed for this header
    #[must_use]
    pub fn vote_sign_bytes(&self, timestamp: Time) -> Vec<u8> {
        vote_sign_bytes(
            &self.signed_header.header.chain_id,
            &self.signed_header.commit,
            timestamp,
        )
    }

    /// Stateless checks of the header against the chain it claims to extend
    /// # Errors
    /// Returns [`TendermintClientError::InvalidHeader`] on the first failing check
    pub fn validate_basic(&self, chain_id: &str) -> Result<(), TendermintClientError> {
        let invalid = |reason: String| TendermintClientError::InvalidHeader { reason };
        let header = &self.signed_header.header;
        let commit = &self.signed_header.commit;

        ensure!(
            self.chain_id() == chain_id,
            invalid(format!(
                "chain id mismatch: expected {chain_id}, found {}",
                self.chain_id()
            ))
        );
        ensure!(
            self.trusted_height.epoch_number <= self.height().epoch_number,
            invalid(format!(
                "trusted height {} is from a later epoch than header height {}",
                self.trusted_height,
                self.height()
            ))
        );
        ensure!(
            commit.height == header.height,
            invalid(format!(
                "commit height {} does not match header height {}",
                commit.height, header.height
            ))
        );
        ensure!(
            commit.block_id.hash == self.block_hash(),
            invalid(format!(
                "commit block id {} is not the header hash {}",
                commit.block_id.hash,
                self.block_hash()
            ))
        );
        self.time()?;

        validator::validate(&self.validator_set)
            .map_err(|e| invalid(format!("validator set: {e}")))?;
        validator::validate(&self.trusted_next_validator_set)
            .map_err(|e| invalid(format!("trusted validator set: {e}")))?;
        ensure!(
            self.validator_set.hash() == header.validators_hash,
            invalid("validator set does not match validators hash".to_string())
        );
        ensure!(
            self.block_signatures().next().is_some(),
            invalid("commit has no signatures for the block".to_string())
        );

        Ok(())
    }
}

/// Length prefixed protobuf of the precommit for `commit.block_id` at `timestamp`
#[must_use]
pub fn vote_sign_bytes(chain_id: &chain::Id, commit: &Commit, timestamp: Time) -> Vec<u8> {
    let vote = CanonicalVote {
        vote_type: vote::Type::Precommit,
        height: commit.height,
        round: commit.round,
        block_id: Some(commit.block_id),
        timestamp: Some(timestamp),
        chain_id: chain_id.clone(),
    };

    <CanonicalVote as Protobuf<tendermint_proto::v0_38::types::CanonicalVote>>::encode_length_delimited_vec(vote)
}

#[cfg(test)]
mod tests {
    use tendermint::AppHash;
    use time::macros::datetime;

    use super::*;
    use crate::test_utils::{self, TestValidators};

    fn header() -> Header {
        test_utils::signed_header(
            "testchain-1",
            Height::new(1, 11),
            Height::new(1, 10),
            datetime!(2024-01-01 00:00 UTC),
            &TestValidators::equal_power(3, 10),
            3,
        )
    }

    fn reason(result: Result<(), TendermintClientError>) -> String {
        match result {
            Err(TendermintClientError::InvalidHeader { reason }) => reason,
            other => panic!("expected invalid header, got {other:?}"),
        }
    }

    #[test]
    fn valid_header() {
        let header = header();
        assert_eq!(header.validate_basic("testchain-1"), Ok(()));
        assert!(header.is_adjacent());
        assert_eq!(header.height(), Height::new(1, 11));
        assert_eq!(header.time(), Ok(datetime!(2024-01-01 00:00 UTC)));
    }

    #[test]
    fn chain_id_and_epoch() {
        assert!(reason(header().validate_basic("otherchain-1")).contains("chain id"));

        let mut later_trusted = header();
        later_trusted.trusted_height = Height::new(2, 1);
        assert!(reason(later_trusted.validate_basic("testchain-1")).contains("later epoch"));
    }

    #[test]
    fn validator_set_must_match_hash() {
        let mut header = header();
        header.validator_set = TestValidators::equal_power(2, 10).validator_set();
        assert!(reason(header.validate_basic("testchain-1")).contains("validators hash"));
    }

    #[test]
    fn commit_must_be_for_this_header() {
        let mut header = header();
        header.signed_header.header.app_hash = AppHash::try_from(b"other".to_vec()).unwrap();
        assert!(reason(header.validate_basic("testchain-1")).contains("block id"));
    }

    #[test]
    fn commit_without_block_votes_is_rejected() {
        let mut header = header();
        header.signed_header.commit.signatures = vec![CommitSig::BlockIdFlagAbsent];
        assert!(reason(header.validate_basic("testchain-1")).contains("no signatures"));
    }

    #[test]
    fn sign_bytes_cover_the_block() {
        let original = header();
        let timestamp = original.signed_header.header.time;

        let mut changed = header();
        changed.signed_header.header.app_hash = AppHash::try_from(b"other".to_vec()).unwrap();
        assert_ne!(original.block_hash(), changed.block_hash());

        changed.signed_header.commit.block_id.hash = changed.block_hash();
        assert_ne!(
            original.vote_sign_bytes(timestamp),
            changed.vote_sign_bytes(timestamp)
        );

        // the signatures are not part of the block identity
        let mut resigned = header();
        resigned.signed_header.commit.signatures.clear();
        assert_eq!(original.block_hash(), resigned.block_hash());
    }
}
