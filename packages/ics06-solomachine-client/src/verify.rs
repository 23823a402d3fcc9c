//! Verification of a single signed solo machine statement.

use ibc_light_utils::ensure;
use prost::Message;

use crate::{
    client_state::ClientState,
    error::SoloMachineError,
    public_key::PublicKey,
    sign_bytes::{DataType, SignBytes},
};

/// A statement signed by the solo machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedData {
    /// Sequence the statement is made at
    pub sequence: u64,
    /// Timestamp of the statement
    pub timestamp: u64,
    /// Diversifier the statement was signed for
    pub diversifier: String,
    /// What the statement commits to
    pub data_type: DataType,
    /// Path of the statement
    pub path: Vec<u8>,
    /// Statement payload
    pub data: Vec<u8>,
    /// Signature over the canonical sign bytes
    pub signature: Vec<u8>,
    /// Key the statement claims to be signed with
    pub public_key: PublicKey,
}

impl SignedData {
    /// The canonical bytes the signature must cover
    #[must_use]
    pub fn sign_bytes(&self) -> Vec<u8> {
        SignBytes::new(
            self.sequence,
            self.timestamp,
            &self.diversifier,
            self.data_type,
            &self.path,
            &self.data,
        )
        .encode_to_vec()
    }
}

/// Verifies `signed_data` against the client and returns the client state advanced past it.
///
/// The returned state has its sequence incremented and its timestamp set to the statement's
/// timestamp. The input state is never modified.
/// # Errors
/// Returns the first failing check, in order: frozen client, public key, diversifier, sequence,
/// signature, timestamp.
pub fn verify_solo_machine_update(
    client_state: &ClientState,
    signed_data: &SignedData,
) -> Result<ClientState, SoloMachineError> {
    client_state.ensure_not_frozen()?;

    let current = &client_state.consensus_state;
    ensure!(
        signed_data.public_key == current.public_key,
        SoloMachineError::InvalidPublicKey
    );
    ensure!(
        signed_data.diversifier == current.diversifier,
        SoloMachineError::InvalidDiversifier {
            expected: current.diversifier.clone(),
            found: signed_data.diversifier.clone(),
        }
    );
    ensure!(
        signed_data.sequence == client_state.sequence,
        SoloMachineError::SequenceMismatch {
            expected: client_state.sequence,
            found: signed_data.sequence,
        }
    );

    current
        .public_key
        .verify(&signed_data.sign_bytes(), &signed_data.signature)?;

    ensure!(
        signed_data.timestamp >= current.timestamp,
        SoloMachineError::NonMonotonicTime {
            current: current.timestamp,
            found: signed_data.timestamp,
        }
    );

    tracing::debug!(
        sequence = signed_data.sequence,
        data_type = ?signed_data.data_type,
        "solo machine statement verified"
    );

    let mut updated = client_state.clone();
    updated.sequence = client_state.sequence.saturating_add(1);
    updated.consensus_state.timestamp = signed_data.timestamp;
    Ok(updated)
}
