//! This module defines [`ClientState`].

use std::time::Duration;

use ibc_light_client_types::{
    identifier::parse_chain_id_epoch, ClientStatus, Height, TrustThreshold,
};
use ibc_light_commitment::ProofSpecs;
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{consensus_state::ConsensusState, error::TendermintClientError};

/// The tendermint light client state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClientState {
    /// Chain identifier of the tracked chain
    pub chain_id: String,
    /// Fraction of a trusted validator set that must sign a non-adjacent header
    pub trust_level: TrustThreshold,
    /// How long a consensus state can be used to verify new headers
    pub trusting_period: Duration,
    /// Unbonding period of the tracked chain
    pub unbonding_period: Duration,
    /// Tolerated clock skew between the host and the tracked chain
    pub max_clock_drift: Duration,
    /// Latest verified height
    pub latest_height: Height,
    /// Height at which misbehaviour froze the client
    pub frozen_height: Option<Height>,
    /// Proof specs of the tracked chain's stores
    pub proof_specs: ProofSpecs,
    /// Store path under which upgraded client states are committed
    pub upgrade_path: Vec<String>,
}

impl ClientState {
    /// Checks the client parameters
    /// # Errors
    /// Returns [`TendermintClientError::InvalidClientState`] on the first failing check
    pub fn validate(&self) -> Result<(), TendermintClientError> {
        let invalid = |reason: &str| TendermintClientError::InvalidClientState {
            reason: reason.to_string(),
        };

        ensure!(
            !self.chain_id.trim().is_empty(),
            invalid("chain id cannot be empty")
        );
        self.trust_level.validate()?;
        ensure!(
            !self.trusting_period.is_zero(),
            invalid("trusting period must be positive")
        );
        ensure!(
            !self.unbonding_period.is_zero(),
            invalid("unbonding period must be positive")
        );
        ensure!(
            self.trusting_period < self.unbonding_period,
            invalid("trusting period must be shorter than the unbonding period")
        );
        ensure!(
            !self.max_clock_drift.is_zero(),
            invalid("max clock drift must be positive")
        );
        ensure!(
            self.latest_height.epoch_height > 0,
            invalid("latest height must be positive")
        );
        ensure!(
            self.latest_height.epoch_number == parse_chain_id_epoch(&self.chain_id),
            invalid("latest height epoch does not match the chain id epoch")
        );
        self.proof_specs
            .validate()
            .map_err(|e| invalid(&e.to_string()))?;
        ensure!(
            self.upgrade_path.iter().all(|segment| !segment.trim().is_empty()),
            invalid("upgrade path segments cannot be empty")
        );

        Ok(())
    }

    /// Whether misbehaviour froze the client
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen_height.is_some()
    }

    /// Rejects any operation on a frozen client
    /// # Errors
    /// Returns [`TendermintClientError::FrozenClient`] if the client is frozen
    pub fn ensure_not_frozen(&self) -> Result<(), TendermintClientError> {
        match self.frozen_height {
            Some(frozen_height) => Err(TendermintClientError::FrozenClient { frozen_height }),
            None => Ok(()),
        }
    }

    /// Status of the client given its latest consensus state
    #[must_use]
    pub fn status(&self, latest_consensus_state: &ConsensusState, now: OffsetDateTime) -> ClientStatus {
        if self.is_frozen() {
            return ClientStatus::Frozen;
        }

        if self.is_within_trusting_period(latest_consensus_state.timestamp, now) {
            ClientStatus::Active
        } else {
            ClientStatus::Expired
        }
    }

    /// Whether a consensus state from `trusted_time` can still be trusted at `now`
    #[must_use]
    pub fn is_within_trusting_period(&self, trusted_time: OffsetDateTime, now: OffsetDateTime) -> bool {
        checked_add(trusted_time, self.trusting_period).map_or(true, |expiry| now < expiry)
    }

    /// The latest time a header may carry when verified at `now`, `None` if unbounded
    #[must_use]
    pub fn max_header_time(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        checked_add(now, self.max_clock_drift)
    }

    /// A copy of the client frozen at `height`
    #[must_use]
    pub fn frozen_at(self, height: Height) -> Self {
        Self {
            frozen_height: Some(height),
            ..self
        }
    }
}

fn checked_add(time: OffsetDateTime, duration: Duration) -> Option<OffsetDateTime> {
    time::Duration::try_from(duration)
        .ok()
        .and_then(|duration| time.checked_add(duration))
}
