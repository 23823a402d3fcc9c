//! Two conflicting statements signed at the same sequence.

use ibc_light_client_types::ClientId;
use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};

use crate::{
    client_state::ClientState,
    error::SoloMachineError,
    sign_bytes::DataType,
    verify::SignedData,
};

/// One signed statement of a [`Misbehaviour`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignatureAndData {
    /// Signature over the statement
    #[serde(with = "ibc_light_utils::serde::base64")]
    pub signature: Vec<u8>,
    /// What the statement commits to
    pub data_type: DataType,
    /// Path of the statement
    #[serde(with = "ibc_light_utils::serde::base64")]
    pub path: Vec<u8>,
    /// Statement payload
    #[serde(with = "ibc_light_utils::serde::base64")]
    pub data: Vec<u8>,
    /// Timestamp of the statement
    pub timestamp: u64,
}

impl SignatureAndData {
    fn signed_data(&self, client_state: &ClientState, sequence: u64) -> SignedData {
        SignedData {
            sequence,
            timestamp: self.timestamp,
            diversifier: client_state.consensus_state.diversifier.clone(),
            data_type: self.data_type,
            path: self.path.clone(),
            data: self.data.clone(),
            signature: self.signature.clone(),
            public_key: client_state.consensus_state.public_key.clone(),
        }
    }
}

/// Evidence of the solo machine signing two different statements at one sequence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Misbehaviour {
    /// The client the evidence is submitted to
    pub client_id: ClientId,
    /// The sequence both statements were signed at
    pub sequence: u64,
    /// First statement
    pub signature_one: SignatureAndData,
    /// Second statement
    pub signature_two: SignatureAndData,
}

impl Misbehaviour {
    /// Checks the evidence fields
    /// # Errors
    /// Returns [`SoloMachineError::InvalidMisbehaviour`] on the first failing check
    pub fn validate_basic(&self) -> Result<(), SoloMachineError> {
        let invalid = |reason: &str| SoloMachineError::InvalidMisbehaviour {
            reason: reason.to_string(),
        };

        ensure!(self.sequence != 0, invalid("sequence cannot be zero"));
        for statement in [&self.signature_one, &self.signature_two] {
            ensure!(
                !statement.signature.is_empty(),
                invalid("signature cannot be empty")
            );
            ensure!(statement.timestamp != 0, invalid("timestamp cannot be zero"));
        }

        let one = &self.signature_one;
        let two = &self.signature_two;
        ensure!(
            (one.data_type, &one.path, &one.data) != (two.data_type, &two.path, &two.data),
            invalid("statements sign identical data")
        );

        Ok(())
    }
}

/// Verifies that both statements are valid signatures of the current key
/// # Errors
/// Returns an error if the client is frozen, the evidence is malformed or a signature is invalid
pub fn verify_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), SoloMachineError> {
    client_state.ensure_not_frozen()?;
    misbehaviour.validate_basic()?;

    for statement in [&misbehaviour.signature_one, &misbehaviour.signature_two] {
        let signed_data = statement.signed_data(client_state, misbehaviour.sequence);
        client_state
            .consensus_state
            .public_key
            .verify(&signed_data.sign_bytes(), &signed_data.signature)?;
    }

    tracing::debug!(
        client_id = %misbehaviour.client_id,
        sequence = misbehaviour.sequence,
        "solo machine misbehaviour verified"
    );
    Ok(())
}

/// Freezes the client
#[must_use]
pub fn update_state_on_misbehaviour(client_state: &ClientState) -> ClientState {
    let mut frozen = client_state.clone();
    frozen.is_frozen = true;
    frozen
}
