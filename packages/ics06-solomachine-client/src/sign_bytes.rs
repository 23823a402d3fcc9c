//! Canonical protobuf encodings signed by the solo machine.

use prost::Message;
use serde::{Deserialize, Serialize};

/// What a signature commits to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A key rotation header
    Header,
    /// A value stored at a path
    Membership,
    /// The absence of a value at a path
    NonMembership,
}

impl DataType {
    /// The protobuf enum value of the data type
    #[must_use]
    pub const fn to_i32(self) -> i32 {
        match self {
            Self::Header => 1,
            Self::Membership => 2,
            Self::NonMembership => 3,
        }
    }
}

/// The bytes signed for any solo machine statement
#[derive(Clone, PartialEq, Eq, Message)]
pub struct SignBytes {
    /// Sequence the statement is made at
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    /// Timestamp of the statement
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    /// Diversifier of the signing key
    #[prost(string, tag = "3")]
    pub diversifier: String,
    /// See [`DataType::to_i32`]
    #[prost(int32, tag = "4")]
    pub data_type: i32,
    /// Path of the statement, empty for headers
    #[prost(bytes = "vec", tag = "5")]
    pub path: Vec<u8>,
    /// Statement payload
    #[prost(bytes = "vec", tag = "6")]
    pub data: Vec<u8>,
}

impl SignBytes {
    /// Create sign bytes for a statement
    #[must_use]
    pub fn new(
        sequence: u64,
        timestamp: u64,
        diversifier: &str,
        data_type: DataType,
        path: &[u8],
        data: &[u8],
    ) -> Self {
        Self {
            sequence,
            timestamp,
            diversifier: diversifier.to_string(),
            data_type: data_type.to_i32(),
            path: path.to_vec(),
            data: data.to_vec(),
        }
    }
}

/// The payload of a key rotation header
#[derive(Clone, PartialEq, Eq, Message)]
pub struct HeaderData {
    /// Tagged encoding of the new public key
    #[prost(bytes = "vec", tag = "1")]
    pub new_public_key: Vec<u8>,
    /// The new diversifier
    #[prost(string, tag = "2")]
    pub new_diversifier: String,
}

/// A signature together with the timestamp it was made at, the proof format of membership
/// statements
#[derive(Clone, PartialEq, Eq, Message)]
pub struct TimestampedSignature {
    /// The signature
    #[prost(bytes = "vec", tag = "1")]
    pub signature_data: Vec<u8>,
    /// Timestamp of the statement
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
}
