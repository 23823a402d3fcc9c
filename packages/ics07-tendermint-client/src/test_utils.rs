//! Deterministic validators, headers and client states for tests.

use std::time::Duration;

use ed25519_dalek::{Signer, SigningKey};
use ibc_light_client_types::{Height, TrustThreshold};
use ibc_light_commitment::{CommitmentRoot, ProofSpecs};
use tendermint::{
    account,
    block::{self, parts, signed_header::SignedHeader, Commit, CommitSig, Round},
    vote::Power,
    AppHash, Hash, PublicKey, Signature, Time,
};
use time::OffsetDateTime;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    header::{vote_sign_bytes, Header},
    validator::{Validator, ValidatorSet},
};

/// Trusting period of [`client_state`]
pub const TRUSTING_PERIOD: Duration = Duration::from_secs(14 * 24 * 60 * 60);
/// Unbonding period of [`client_state`]
pub const UNBONDING_PERIOD: Duration = Duration::from_secs(21 * 24 * 60 * 60);
/// Max clock drift of [`client_state`]
pub const MAX_CLOCK_DRIFT: Duration = Duration::from_secs(10);

/// A client tracking `chain_id` with trust level 1/3 and cosmos proof specs
#[must_use]
pub fn client_state(chain_id: &str, latest_height: Height) -> ClientState {
    ClientState {
        chain_id: chain_id.to_string(),
        trust_level: TrustThreshold::ONE_THIRD,
        trusting_period: TRUSTING_PERIOD,
        unbonding_period: UNBONDING_PERIOD,
        max_clock_drift: MAX_CLOCK_DRIFT,
        latest_height,
        frozen_height: None,
        proof_specs: ProofSpecs::cosmos(),
        upgrade_path: vec!["upgrade".to_string(), "upgradedIBCState".to_string()],
    }
}

/// A consensus state with a fixed root
#[must_use]
pub fn consensus_state(
    timestamp: OffsetDateTime,
    next_validators_hash: impl AsRef<[u8]>,
) -> ConsensusState {
    ConsensusState {
        timestamp,
        root: CommitmentRoot::from_bytes(b"root"),
        next_validators_hash: next_validators_hash.as_ref().to_vec(),
    }
}

/// `time` as a tendermint timestamp
/// # Panics
/// Panics if `time` is outside the tendermint time range
#[must_use]
pub fn tendermint_time(time: OffsetDateTime) -> Time {
    Time::from_unix_timestamp(time.unix_timestamp(), time.nanosecond()).expect("time in range")
}

/// Validators with signing keys derived from `[seed; 32]`
#[derive(Clone, Debug)]
pub struct TestValidators {
    signers: Vec<(SigningKey, u64)>,
}

impl TestValidators {
    /// Validators from `(seed, voting_power)` pairs
    #[must_use]
    pub fn new(seeds_and_powers: &[(u8, u64)]) -> Self {
        Self {
            signers: seeds_and_powers
                .iter()
                .map(|&(seed, power)| (SigningKey::from_bytes(&[seed; 32]), power))
                .collect(),
        }
    }

    /// `count` validators with equal power, seeded from 1
    #[must_use]
    pub fn equal_power(count: u8, power: u64) -> Self {
        let seeds: Vec<(u8, u64)> = (1..=count).map(|seed| (seed, power)).collect();
        Self::new(&seeds)
    }

    /// The public validator set
    /// # Panics
    /// Panics if a voting power does not fit a tendermint power
    #[must_use]
    pub fn validator_set(&self) -> ValidatorSet {
        ValidatorSet::new(
            self.signers
                .iter()
                .map(|(key, power)| {
                    Validator::new(
                        public_key(key),
                        Power::try_from(*power).expect("voting power in range"),
                    )
                })
                .collect(),
            None,
        )
    }

    /// A commit for `header` signed by the validators at `indices`, every other validator of
    /// this set is absent
    /// # Panics
    /// Panics if the header cannot be committed to
    #[must_use]
    pub fn sign(&self, header: &Header, indices: impl IntoIterator<Item = usize>) -> Commit {
        let block_hash = header.block_hash();
        let mut commit = Commit {
            height: header.signed_header.header.height,
            round: Round::try_from(0_u16).expect("round in range"),
            block_id: block::Id {
                hash: block_hash,
                part_set_header: parts::Header::new(1, block_hash).expect("valid part set header"),
            },
            signatures: vec![],
        };

        let signing: Vec<&SigningKey> = indices.into_iter().map(|i| &self.signers[i].0).collect();
        let timestamp = header.signed_header.header.time;
        let sign_bytes = vote_sign_bytes(&header.signed_header.header.chain_id, &commit, timestamp);

        commit.signatures = self
            .validator_set()
            .validators()
            .iter()
            .map(|validator| {
                signing
                    .iter()
                    .find(|key| account::Id::from(public_key(key)) == validator.address)
                    .map_or(CommitSig::BlockIdFlagAbsent, |key| CommitSig::BlockIdFlagCommit {
                        validator_address: validator.address,
                        timestamp,
                        signature: Some(
                            Signature::try_from(key.sign(&sign_bytes).to_bytes().as_slice())
                                .expect("64 byte signature"),
                        ),
                    })
            })
            .collect();
        commit
    }

    /// A commit for `header` signed by the first `count` validators
    #[must_use]
    pub fn sign_first(&self, header: &Header, count: usize) -> Commit {
        self.sign(header, 0..count)
    }

    /// Number of validators
    #[must_use]
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether there are no validators
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

fn public_key(key: &SigningKey) -> PublicKey {
    PublicKey::from_raw_ed25519(&key.verifying_key().to_bytes()).expect("valid ed25519 key")
}

/// An unsigned header at `height` produced by `validators` handing over to `next_validators`.
/// The trusted validator set is set to `validators`, override it for non-adjacent headers.
/// # Panics
/// Panics if the chain id, height or validator sets are not valid tendermint values
#[must_use]
pub fn unsigned_header(
    chain_id: &str,
    height: Height,
    trusted_height: Height,
    time: OffsetDateTime,
    validators: &ValidatorSet,
    next_validators: &ValidatorSet,
) -> Header {
    let block_height = block::Height::try_from(height.epoch_height).expect("non-zero height");
    let header = block::Header {
        version: block::header::Version { block: 11, app: 0 },
        chain_id: chain_id.to_string().try_into().expect("valid chain id"),
        height: block_height,
        time: tendermint_time(time),
        last_block_id: None,
        last_commit_hash: None,
        data_hash: None,
        validators_hash: validators.hash(),
        next_validators_hash: next_validators.hash(),
        consensus_hash: Hash::Sha256([0; 32]),
        app_hash: AppHash::try_from(format!("app hash at {height}").into_bytes())
            .expect("valid app hash"),
        last_results_hash: None,
        evidence_hash: None,
        proposer_address: validators
            .validators()
            .first()
            .map_or_else(|| account::Id::new([0; 20]), |v| v.address),
    };
    let commit = Commit {
        height: block_height,
        round: Round::try_from(0_u16).expect("round in range"),
        block_id: block::Id {
            hash: header.hash(),
            part_set_header: parts::Header::new(1, header.hash()).expect("valid part set header"),
        },
        signatures: vec![],
    };

    Header {
        signed_header: SignedHeader::new(header, commit).expect("commit matches header height"),
        validator_set: validators.clone(),
        trusted_height,
        trusted_next_validator_set: validators.clone(),
    }
}

/// A header at `height` signed by the first `signers` of `validators`, which stay in power
#[must_use]
pub fn signed_header(
    chain_id: &str,
    height: Height,
    trusted_height: Height,
    time: OffsetDateTime,
    validators: &TestValidators,
    signers: usize,
) -> Header {
    let set = validators.validator_set();
    let mut header = unsigned_header(chain_id, height, trusted_height, time, &set, &set);
    header.signed_header.commit = validators.sign_first(&header, signers);
    header
}
