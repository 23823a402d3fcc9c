//! This module provides custom serde implementations for byte fields.

/// Serialize bytes as a base64 string.
pub mod base64 {
    use base64::prelude::*;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Implements the serde `serialize` function for a byte buffer.
    /// # Errors
    /// Returns an error if the serializer fails.
    pub fn serialize<S, T: AsRef<[u8]>>(data: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64_STANDARD.encode(data))
    }

    /// Implements the serde `deserialize` function for a byte buffer.
    /// # Errors
    /// Returns an error if the string is not valid base64 or cannot be converted to `T`.
    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        let s = String::deserialize(deserializer)?;
        let decoded = BASE64_STANDARD
            .decode(s.as_bytes())
            .map_err(de::Error::custom)?;
        T::try_from(decoded).map_err(|_| de::Error::custom("Invalid base64 data"))
    }

    /// Serialize fixed size byte arrays as base64 strings.
    pub mod fixed_size {
        use base64::prelude::*;
        use serde::{de, Deserialize, Deserializer, Serializer};

        /// Implements the serde `serialize` function for a fixed size byte array.
        /// # Errors
        /// Returns an error if the serializer fails.
        pub fn serialize<S, T: AsRef<[u8]>>(data: T, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&BASE64_STANDARD.encode(data))
        }

        /// Implements the serde `deserialize` function for a fixed size byte array.
        /// # Errors
        /// Returns an error if the string is not valid base64 or has the wrong length.
        pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            let decoded = BASE64_STANDARD
                .decode(s.as_bytes())
                .map_err(de::Error::custom)?;

            decoded.as_slice().try_into().map_err(|_| {
                de::Error::custom(format!("expected {N} bytes, found {}", decoded.len()))
            })
        }
    }

    /// Serialize a list of byte buffers as a list of base64 strings.
    pub mod vec {
        use base64::prelude::*;
        use serde::{de, Deserialize, Deserializer, Serializer};

        /// Implements the serde `serialize` function for a list of byte buffers.
        /// # Errors
        /// Returns an error if the serializer fails.
        pub fn serialize<S: Serializer, T: AsRef<[u8]>>(
            #[allow(clippy::ptr_arg)] // required by serde
            bytes: &Vec<T>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(bytes.iter().map(|b| BASE64_STANDARD.encode(b)))
        }

        /// Implements the serde `deserialize` function for a list of byte buffers.
        /// # Errors
        /// Returns an error if any entry is not valid base64 or cannot be converted to `T`.
        pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
        where
            D: Deserializer<'de>,
            T: TryFrom<Vec<u8>>,
        {
            let vec = Vec::<String>::deserialize(deserializer)?;
            vec.into_iter()
                .map(|s| {
                    let decoded = BASE64_STANDARD
                        .decode(s.as_bytes())
                        .map_err(de::Error::custom)?;
                    T::try_from(decoded).map_err(|_| de::Error::custom("Invalid base64 data"))
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::base64")]
        root: Vec<u8>,
        #[serde(with = "super::base64::fixed_size")]
        hash: [u8; 4],
        #[serde(with = "super::base64::vec")]
        items: Vec<Vec<u8>>,
    }

    #[test]
    fn bytes_are_written_as_base64() {
        let sample = Sample {
            root: b"root".to_vec(),
            hash: [1, 2, 3, 4],
            items: vec![vec![0xff], vec![]],
        };

        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["root"], "cm9vdA==");
        assert_eq!(json["hash"], "AQIDBA==");
        assert_eq!(json["items"], serde_json::json!(["/w==", ""]));

        let decoded: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn fixed_size_rejects_wrong_length() {
        let json = serde_json::json!({ "root": "", "hash": "AQID", "items": [] });
        let err = serde_json::from_value::<Sample>(json).unwrap_err();
        assert!(err.to_string().contains("expected 4 bytes, found 3"));
    }
}
