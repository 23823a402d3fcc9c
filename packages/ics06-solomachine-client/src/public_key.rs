//! This module defines [`PublicKey`].

use ibc_light_utils::ensure;
use k256::ecdsa::signature::Verifier;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SoloMachineError;

const SECP256K1_TAG: u8 = 0x01;
const ED25519_TAG: u8 = 0x02;

/// The public key of a solo machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// ECDSA over secp256k1, signatures are 64 byte `r || s` with low `s`
    Secp256k1(k256::ecdsa::VerifyingKey),
    /// Ed25519, signatures are verified strictly
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Tagged encoding: `0x01 || sec1 compressed point` or `0x02 || ed25519 key`
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Secp256k1(key) => {
                let mut bytes = vec![SECP256K1_TAG];
                bytes.extend_from_slice(key.to_encoded_point(true).as_bytes());
                bytes
            }
            Self::Ed25519(key) => {
                let mut bytes = vec![ED25519_TAG];
                bytes.extend_from_slice(key.as_bytes());
                bytes
            }
        }
    }

    /// Decodes the tagged encoding
    /// # Errors
    /// Returns an error if the tag is unknown or the key is not a valid point
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SoloMachineError> {
        let malformed = |reason: String| SoloMachineError::MalformedPublicKey { reason };

        let (tag, key) = bytes
            .split_first()
            .ok_or_else(|| malformed("empty public key".to_string()))?;
        match *tag {
            SECP256K1_TAG => k256::ecdsa::VerifyingKey::from_sec1_bytes(key)
                .map(Self::Secp256k1)
                .map_err(|e| malformed(format!("secp256k1: {e}"))),
            ED25519_TAG => {
                let key: &[u8; 32] = key
                    .try_into()
                    .map_err(|_| malformed(format!("ed25519 key must be 32 bytes, found {}", key.len())))?;
                ed25519_dalek::VerifyingKey::from_bytes(key)
                    .map(Self::Ed25519)
                    .map_err(|e| malformed(format!("ed25519: {e}")))
            }
            other => Err(malformed(format!("unknown key type tag {other:#04x}"))),
        }
    }

    /// Verifies `signature` over `message`
    /// # Errors
    /// Returns [`SoloMachineError::InvalidSignature`] if the signature is malformed or invalid
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), SoloMachineError> {
        let invalid = |reason: String| SoloMachineError::InvalidSignature { reason };
        ensure!(!signature.is_empty(), invalid("empty signature".to_string()));

        match self {
            Self::Secp256k1(key) => {
                let signature = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| invalid(e.to_string()))?;
                key.verify(message, &signature)
                    .map_err(|e| invalid(e.to_string()))
            }
            Self::Ed25519(key) => {
                let signature = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|e| invalid(e.to_string()))?;
                key.verify_strict(message, &signature)
                    .map_err(|e| invalid(e.to_string()))
            }
        }
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ibc_light_utils::serde::base64::serialize(self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = ibc_light_utils::serde::base64::deserialize(deserializer)?;
        Self::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::TestKey;

    #[rstest]
    #[case::secp256k1(TestKey::secp256k1(1), 34)]
    #[case::ed25519(TestKey::ed25519(1), 33)]
    fn tagged_encoding_roundtrips(#[case] key: TestKey, #[case] len: usize) {
        let public_key = key.public_key();
        let bytes = public_key.to_bytes();
        assert_eq!(bytes.len(), len);
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), public_key);

        let json = serde_json::to_string(&public_key).unwrap();
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), public_key);
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::unknown_tag(&[0x09, 1, 2, 3])]
    #[case::short_ed25519(&[ED25519_TAG, 1, 2, 3])]
    #[case::invalid_point(&[SECP256K1_TAG, 0x05, 1, 2])]
    fn malformed_keys_are_rejected(#[case] bytes: &[u8]) {
        assert!(matches!(
            PublicKey::from_bytes(bytes),
            Err(SoloMachineError::MalformedPublicKey { .. })
        ));
    }

    #[rstest]
    #[case::secp256k1(TestKey::secp256k1(2))]
    #[case::ed25519(TestKey::ed25519(2))]
    fn signatures_verify_only_for_the_signed_message(#[case] key: TestKey) {
        let signature = key.sign(b"message");
        assert_eq!(key.public_key().verify(b"message", &signature), Ok(()));
        assert!(matches!(
            key.public_key().verify(b"other message", &signature),
            Err(SoloMachineError::InvalidSignature { .. })
        ));
        assert!(matches!(
            key.public_key().verify(b"message", &[]),
            Err(SoloMachineError::InvalidSignature { .. })
        ));
    }
}
