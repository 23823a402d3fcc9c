//! Commitment roots and their serialized form.

pub use ibc_core_commitment_types::commitment::CommitmentRoot;

/// Serde helpers storing a [`CommitmentRoot`] as base64 of its raw bytes.
///
/// Use with `#[serde(with = "ibc_light_commitment::commitment::base64_root")]`.
pub mod base64_root {
    use serde::{Deserializer, Serializer};

    use super::CommitmentRoot;

    /// Serialize the root bytes as base64
    /// # Errors
    /// Returns an error if the serializer fails
    pub fn serialize<S: Serializer>(root: &CommitmentRoot, serializer: S) -> Result<S::Ok, S::Error> {
        ibc_light_utils::serde::base64::serialize(root.as_bytes(), serializer)
    }

    /// Deserialize a base64 string into a root
    /// # Errors
    /// Returns an error if the input is not valid base64
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CommitmentRoot, D::Error> {
        let bytes: Vec<u8> = ibc_light_utils::serde::base64::deserialize(deserializer)?;
        Ok(CommitmentRoot::from_bytes(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Stored {
        #[serde(with = "base64_root")]
        root: CommitmentRoot,
    }

    #[test]
    fn root_is_stored_as_base64() {
        let stored = Stored {
            root: CommitmentRoot::from_bytes(b"app hash"),
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert_eq!(json, r#"{"root":"YXBwIGhhc2g="}"#);

        let decoded: Stored = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.root.as_bytes(), b"app hash");
    }
}
