//! Key rotation headers.

use ibc_light_utils::ensure;
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{
    client_state::{ClientState, ConsensusState},
    error::SoloMachineError,
    public_key::PublicKey,
    sign_bytes::{DataType, HeaderData},
    verify::{verify_solo_machine_update, SignedData},
};

/// Rotates the solo machine to a new key and diversifier
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Sequence the rotation is made at
    pub sequence: u64,
    /// Timestamp of the rotation
    pub timestamp: u64,
    /// Signature of the current key
    #[serde(with = "ibc_light_utils::serde::base64")]
    pub signature: Vec<u8>,
    /// The key that signs from now on
    pub new_public_key: PublicKey,
    /// The diversifier used from now on
    pub new_diversifier: String,
}

impl Header {
    /// Checks the header fields
    /// # Errors
    /// Returns [`SoloMachineError::InvalidHeader`] on the first failing check
    pub fn validate_basic(&self) -> Result<(), SoloMachineError> {
        let invalid = |reason: &str| SoloMachineError::InvalidHeader {
            reason: reason.to_string(),
        };

        ensure!(self.sequence != 0, invalid("sequence cannot be zero"));
        ensure!(self.timestamp != 0, invalid("timestamp cannot be zero"));
        ensure!(!self.signature.is_empty(), invalid("signature cannot be empty"));
        ensure!(
            self.new_diversifier.is_empty() || !self.new_diversifier.trim().is_empty(),
            invalid("diversifier cannot consist of whitespace only")
        );

        Ok(())
    }

    /// The payload signed by the current key
    #[must_use]
    pub fn header_data(&self) -> HeaderData {
        HeaderData {
            new_public_key: self.new_public_key.to_bytes(),
            new_diversifier: self.new_diversifier.clone(),
        }
    }

    /// The header as a statement signed by the current key of `client_state`
    #[must_use]
    pub fn signed_data(&self, client_state: &ClientState) -> SignedData {
        SignedData {
            sequence: self.sequence,
            timestamp: self.timestamp,
            diversifier: client_state.consensus_state.diversifier.clone(),
            data_type: DataType::Header,
            path: Vec::new(),
            data: self.header_data().encode_to_vec(),
            signature: self.signature.clone(),
            public_key: client_state.consensus_state.public_key.clone(),
        }
    }
}

/// Verifies a key rotation header against the current key
/// # Errors
/// Returns an error if the header is malformed or the statement fails verification
pub fn verify_header(client_state: &ClientState, header: &Header) -> Result<(), SoloMachineError> {
    client_state.ensure_not_frozen()?;
    header.validate_basic()?;
    verify_solo_machine_update(client_state, &header.signed_data(client_state))?;
    Ok(())
}

/// Applies a verified header: the key and diversifier are replaced and the sequence follows the
/// client's [`SequencePolicy`](crate::SequencePolicy).
#[must_use]
pub fn apply_header(client_state: &ClientState, header: &Header) -> ClientState {
    tracing::debug!(
        sequence = header.sequence,
        policy = ?client_state.sequence_policy,
        "solo machine key rotated"
    );

    ClientState {
        sequence: client_state
            .sequence_policy
            .sequence_after_rotation(header.sequence),
        is_frozen: client_state.is_frozen,
        consensus_state: ConsensusState {
            public_key: header.new_public_key.clone(),
            diversifier: header.new_diversifier.clone(),
            timestamp: header.timestamp,
        },
        sequence_policy: client_state.sequence_policy,
    }
}
