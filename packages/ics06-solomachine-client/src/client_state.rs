//! This module defines [`ClientState`], [`ConsensusState`] and [`SequencePolicy`].

use ibc_light_client_types::ClientStatus;
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};

use crate::{error::SoloMachineError, public_key::PublicKey};

/// The key the solo machine currently signs with
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    /// Current public key
    pub public_key: PublicKey,
    /// Disambiguates statements of solo machines sharing a key
    pub diversifier: String,
    /// Timestamp of the latest accepted statement
    pub timestamp: u64,
}

/// The sequence a solo machine continues at after a key rotation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequencePolicy {
    /// The next statement is expected at the rotation sequence plus one
    #[default]
    Continue,
    /// The next statement is expected at sequence 1
    Reset,
}

impl SequencePolicy {
    /// The sequence expected after a rotation accepted at `sequence`
    #[must_use]
    pub const fn sequence_after_rotation(self, sequence: u64) -> u64 {
        match self {
            Self::Continue => sequence.saturating_add(1),
            Self::Reset => 1,
        }
    }
}

/// The solo machine client state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    /// The sequence the next statement must be made at
    pub sequence: u64,
    /// Whether misbehaviour froze the client
    pub is_frozen: bool,
    /// The current key
    pub consensus_state: ConsensusState,
    /// Sequence handling on key rotation
    #[serde(default)]
    pub sequence_policy: SequencePolicy,
}

impl ClientState {
    /// Create an active client at sequence 1
    #[must_use]
    pub fn new(consensus_state: ConsensusState, sequence_policy: SequencePolicy) -> Self {
        Self {
            sequence: 1,
            is_frozen: false,
            consensus_state,
            sequence_policy,
        }
    }

    /// Checks the client parameters
    /// # Errors
    /// Returns [`SoloMachineError::InvalidClientState`] on the first failing check
    pub fn validate(&self) -> Result<(), SoloMachineError> {
        let invalid = |reason: &str| SoloMachineError::InvalidClientState {
            reason: reason.to_string(),
        };

        ensure!(self.sequence >= 1, invalid("sequence must start at 1"));
        ensure!(
            self.consensus_state.timestamp != 0,
            invalid("timestamp cannot be zero")
        );
        ensure!(
            self.consensus_state.diversifier.is_empty()
                || !self.consensus_state.diversifier.trim().is_empty(),
            invalid("diversifier cannot consist of whitespace only")
        );

        Ok(())
    }

    /// Rejects any operation on a frozen client
    /// # Errors
    /// Returns [`SoloMachineError::FrozenClient`] if the client is frozen
    pub const fn ensure_not_frozen(&self) -> Result<(), SoloMachineError> {
        if self.is_frozen {
            return Err(SoloMachineError::FrozenClient);
        }
        Ok(())
    }

    /// Solo machine clients never expire
    #[must_use]
    pub const fn status(&self) -> ClientStatus {
        if self.is_frozen {
            ClientStatus::Frozen
        } else {
            ClientStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::{client_state, TestKey};

    #[rstest]
    #[case::continue_policy(SequencePolicy::Continue, 8)]
    #[case::reset_policy(SequencePolicy::Reset, 1)]
    fn sequence_after_rotation(#[case] policy: SequencePolicy, #[case] expected: u64) {
        assert_eq!(policy.sequence_after_rotation(7), expected);
    }

    #[test]
    fn validation() {
        let valid = client_state(&TestKey::ed25519(1), 1, SequencePolicy::default());
        assert_eq!(valid.validate(), Ok(()));

        let mut zero_sequence = valid.clone();
        zero_sequence.sequence = 0;
        assert!(zero_sequence.validate().is_err());

        let mut zero_timestamp = valid.clone();
        zero_timestamp.consensus_state.timestamp = 0;
        assert!(zero_timestamp.validate().is_err());

        let mut blank_diversifier = valid;
        blank_diversifier.consensus_state.diversifier = "  ".to_string();
        assert!(blank_diversifier.validate().is_err());
    }

    #[test]
    fn sequence_policy_defaults_to_continue() {
        let client_state = client_state(&TestKey::secp256k1(1), 3, SequencePolicy::Reset);
        let mut json = serde_json::to_value(&client_state).unwrap();
        json.as_object_mut().unwrap().remove("sequence_policy");

        let decoded: ClientState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.sequence_policy, SequencePolicy::Continue);
    }

    #[test]
    fn status() {
        let mut client_state = client_state(&TestKey::ed25519(1), 1, SequencePolicy::default());
        assert_eq!(client_state.status(), ClientStatus::Active);
        client_state.is_frozen = true;
        assert_eq!(client_state.status(), ClientStatus::Frozen);
        assert_eq!(client_state.ensure_not_frozen(), Err(SoloMachineError::FrozenClient));
    }
}
