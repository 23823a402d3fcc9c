//! Header verification against a trusted consensus state.

use std::{collections::BTreeSet, fmt::Display};

use ed25519_dalek::{Signature, SignatureError, VerifyingKey};
use ibc_light_client_types::TrustThreshold;
use ibc_light_utils::ensure;
use tendermint::PublicKey;
use time::OffsetDateTime;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    error::TendermintClientError,
    header::Header,
    validator::{self, ValidatorSet},
};

/// Verifies validator signatures over vote sign bytes
pub trait SignatureVerifier {
    /// The error returned for an invalid signature
    type Error: Display;

    /// Verifies `signature` over `message` by `public_key`
    /// # Errors
    /// Returns an error if the key or signature is malformed or the signature does not verify
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &[u8])
        -> Result<(), Self::Error>;
}

/// Ed25519 signature verification with strict (non-malleable) checks
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    type Error = SignatureError;

    fn verify(
        &self,
        public_key: &PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), Self::Error> {
        let key = public_key.ed25519().ok_or_else(SignatureError::new)?;
        let key = VerifyingKey::try_from(key.as_bytes())?;
        let signature = Signature::from_slice(signature)?;
        key.verify_strict(message, &signature)
    }
}

/// Verifies a header against the trusted consensus state at `header.trusted_height`.
///
/// Checks, each a terminal rejection:
/// - the client is not frozen
/// - the header is above its trusted height
/// - the header is structurally valid, see [`Header::validate_basic`]
/// - the trusted consensus state is within the trusting period
/// - the header time is after the trusted time and before `now + max_clock_drift`
/// - enough of the trusted validator set signed the header
/// - every signature is valid and the signed power meets the trust level
///
/// # Errors
/// Returns the error of the first failing check
pub fn verify_header<V: SignatureVerifier>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
    now: OffsetDateTime,
    signature_verifier: &V,
) -> Result<(), TendermintClientError> {
    client_state.ensure_not_frozen()?;

    let height = header.height();
    ensure!(
        height > header.trusted_height,
        TendermintClientError::InvalidHeight {
            header_height: height,
            trusted_height: header.trusted_height,
        }
    );

    header.validate_basic(&client_state.chain_id)?;
    let header_time = header.time()?;

    ensure!(
        client_state.is_within_trusting_period(trusted_consensus_state.timestamp, now),
        TendermintClientError::ExpiredClient {
            trusted_time: trusted_consensus_state.timestamp,
            now,
        }
    );

    ensure!(
        header_time > trusted_consensus_state.timestamp,
        TendermintClientError::NonMonotonicTime {
            header_time,
            trusted_time: trusted_consensus_state.timestamp,
        }
    );

    if let Some(max_time) = client_state.max_header_time(now) {
        ensure!(
            header_time < max_time,
            TendermintClientError::HeaderTimeTooFarInFuture {
                header_time,
                max_time,
            }
        );
    }

    verify_validator_overlap(client_state.trust_level, trusted_consensus_state, header)?;
    verify_commit_signatures(client_state.trust_level, header, signature_verifier)?;

    tracing::debug!(
        %height,
        trusted_height = %header.trusted_height,
        adjacent = header.is_adjacent(),
        "header verified"
    );

    Ok(())
}

/// Checks that the validator set trusted by the consensus state signed enough of the commit.
///
/// For an adjacent header the header's own validator set must be the trusted next validator
/// set, otherwise the header must carry the trusted validator set explicitly.
fn verify_validator_overlap(
    trust_level: TrustThreshold,
    trusted_consensus_state: &ConsensusState,
    header: &Header,
) -> Result<(), TendermintClientError> {
    let insufficient = |reason: String| TendermintClientError::InsufficientValidatorOverlap { reason };
    let trusted_hash = trusted_consensus_state.next_validators_hash.as_slice();

    let trusted_set = if header.is_adjacent() {
        let validators_hash = header.signed_header.header.validators_hash;
        ensure!(
            validators_hash.as_bytes() == trusted_hash,
            insufficient(format!(
                "adjacent header validators hash {validators_hash} does not match trusted next validators hash {}",
                hex::encode_upper(trusted_hash)
            ))
        );
        &header.validator_set
    } else {
        let hash = header.trusted_next_validator_set.hash();
        ensure!(
            hash.as_bytes() == trusted_hash,
            insufficient(format!(
                "trusted validator set hash {hash} does not match trusted next validators hash {}",
                hex::encode_upper(trusted_hash)
            ))
        );
        &header.trusted_next_validator_set
    };

    let (signed, total) = signed_power(trusted_set, header);
    ensure!(
        trust_level.is_met(signed, total),
        insufficient(format!(
            "trusted validators signed {signed} of {total} voting power, trust level is {trust_level}"
        ))
    );

    Ok(())
}

/// Power of the distinct members of `validators` that voted for the block, and the total
/// power of `validators`.
fn signed_power(validators: &ValidatorSet, header: &Header) -> (u64, u64) {
    let mut seen = BTreeSet::new();
    let signed = header
        .block_signatures()
        .filter(|(address, _, _)| seen.insert(*address))
        .filter_map(|(address, _, _)| validator::find(validators, &address))
        .fold(0_u64, |power, v| power.saturating_add(v.power.value()));

    (signed, validator::total_voting_power(validators))
}

fn verify_commit_signatures<V: SignatureVerifier>(
    trust_level: TrustThreshold,
    header: &Header,
    signature_verifier: &V,
) -> Result<(), TendermintClientError> {
    let invalid = |reason: String| TendermintClientError::InvalidSignatures { reason };

    let mut seen = BTreeSet::new();
    let mut signed: u64 = 0;
    for (address, timestamp, signature) in header.block_signatures() {
        ensure!(
            seen.insert(address),
            invalid(format!("duplicate signature from validator {address}"))
        );

        let validator = validator::find(&header.validator_set, &address)
            .ok_or_else(|| invalid(format!("signer {address} is not in the validator set")))?;
        let signature =
            signature.ok_or_else(|| invalid(format!("validator {address} voted without a signature")))?;

        signature_verifier
            .verify(
                &validator.pub_key,
                &header.vote_sign_bytes(timestamp),
                signature.as_bytes(),
            )
            .map_err(|e| invalid(format!("signature of validator {address}: {e}")))?;

        signed = signed.saturating_add(validator.power.value());
    }

    let total = validator::total_voting_power(&header.validator_set);
    ensure!(
        trust_level.is_met(signed, total),
        invalid(format!(
            "signed voting power {signed} of {total} is below trust level {trust_level}"
        ))
    );

    Ok(())
}
