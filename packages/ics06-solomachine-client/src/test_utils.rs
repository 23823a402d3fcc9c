//! Deterministic keys and signed statements for tests.

use ed25519_dalek::Signer as _;
use ibc_light_client_types::{ClientId, ClientType};
use k256::ecdsa::signature::Signer as _;
use prost::Message;

use crate::{
    client_state::{ClientState, ConsensusState, SequencePolicy},
    header::Header,
    misbehaviour::{Misbehaviour, SignatureAndData},
    public_key::PublicKey,
    sign_bytes::{DataType, HeaderData, SignBytes, TimestampedSignature},
    verify::SignedData,
};

/// Diversifier of the test clients
pub const DIVERSIFIER: &str = "testing";
/// Initial timestamp of the test clients
pub const TIMESTAMP: u64 = 1_700_000_000;

/// A signing key derived from a one byte seed
#[derive(Clone, Debug)]
pub enum TestKey {
    /// secp256k1 ECDSA key
    Secp256k1(k256::ecdsa::SigningKey),
    /// Ed25519 key
    Ed25519(ed25519_dalek::SigningKey),
}

impl TestKey {
    /// secp256k1 key with secret `[seed; 32]`
    /// # Panics
    /// Panics if the seed yields an invalid scalar, which cannot happen for non-zero seeds
    #[must_use]
    pub fn secp256k1(seed: u8) -> Self {
        Self::Secp256k1(k256::ecdsa::SigningKey::from_bytes(&[seed; 32].into()).unwrap())
    }

    /// Ed25519 key with secret `[seed; 32]`
    #[must_use]
    pub fn ed25519(seed: u8) -> Self {
        Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[seed; 32]))
    }

    /// The verifying key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Secp256k1(key) => PublicKey::Secp256k1(key.verifying_key().clone()),
            Self::Ed25519(key) => PublicKey::Ed25519(key.verifying_key()),
        }
    }

    /// Signs `message`
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key.sign(message);
                signature.to_bytes().to_vec()
            }
            Self::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
        }
    }
}

/// An active client of `key` at `sequence`
#[must_use]
pub fn client_state(key: &TestKey, sequence: u64, sequence_policy: SequencePolicy) -> ClientState {
    ClientState {
        sequence,
        is_frozen: false,
        consensus_state: ConsensusState {
            public_key: key.public_key(),
            diversifier: DIVERSIFIER.to_string(),
            timestamp: TIMESTAMP,
        },
        sequence_policy,
    }
}

/// A membership statement signed by `key`
#[must_use]
pub fn signed_data(
    key: &TestKey,
    sequence: u64,
    timestamp: u64,
    path: &[u8],
    data: &[u8],
) -> SignedData {
    let mut signed_data = SignedData {
        sequence,
        timestamp,
        diversifier: DIVERSIFIER.to_string(),
        data_type: DataType::Membership,
        path: path.to_vec(),
        data: data.to_vec(),
        signature: Vec::new(),
        public_key: key.public_key(),
    };
    signed_data.signature = key.sign(&signed_data.sign_bytes());
    signed_data
}

/// A header rotating from `key` to `new_key`, signed with the test diversifier
#[must_use]
pub fn rotation_header(
    key: &TestKey,
    new_key: &TestKey,
    sequence: u64,
    timestamp: u64,
    new_diversifier: &str,
) -> Header {
    let data = HeaderData {
        new_public_key: new_key.public_key().to_bytes(),
        new_diversifier: new_diversifier.to_string(),
    };
    let sign_bytes = SignBytes::new(
        sequence,
        timestamp,
        DIVERSIFIER,
        DataType::Header,
        &[],
        &data.encode_to_vec(),
    );

    Header {
        sequence,
        timestamp,
        signature: key.sign(&sign_bytes.encode_to_vec()),
        new_public_key: new_key.public_key(),
        new_diversifier: new_diversifier.to_string(),
    }
}

/// A protobuf [`TimestampedSignature`] proof for a membership or non-membership statement
#[must_use]
pub fn statement_proof(
    key: &TestKey,
    sequence: u64,
    timestamp: u64,
    data_type: DataType,
    path: &[u8],
    data: &[u8],
) -> Vec<u8> {
    let sign_bytes = SignBytes::new(sequence, timestamp, DIVERSIFIER, data_type, path, data);
    TimestampedSignature {
        signature_data: key.sign(&sign_bytes.encode_to_vec()),
        timestamp,
    }
    .encode_to_vec()
}

/// A statement of `key` at `sequence`, for misbehaviour evidence
#[must_use]
pub fn signature_and_data(
    key: &TestKey,
    sequence: u64,
    path: &[u8],
    data: &[u8],
) -> SignatureAndData {
    let sign_bytes = SignBytes::new(
        sequence,
        TIMESTAMP,
        DIVERSIFIER,
        DataType::Membership,
        path,
        data,
    );
    SignatureAndData {
        signature: key.sign(&sign_bytes.encode_to_vec()),
        data_type: DataType::Membership,
        path: path.to_vec(),
        data: data.to_vec(),
        timestamp: TIMESTAMP,
    }
}

/// Two statements of `key` at `sequence` over different data
#[must_use]
pub fn misbehaviour(key: &TestKey, sequence: u64) -> Misbehaviour {
    Misbehaviour {
        client_id: ClientId::new(ClientType::SoloMachine, 0),
        sequence,
        signature_one: signature_and_data(key, sequence, b"path", b"value-one"),
        signature_two: signature_and_data(key, sequence, b"path", b"value-two"),
    }
}
