//! This module defines [`ClientStatus`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a light client as seen by the host
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientStatus {
    /// The client can be updated and proofs can be verified against it
    Active,
    /// The latest consensus state is outside of the trusting period
    Expired,
    /// Misbehaviour was submitted, the client is permanently unusable
    Frozen,
}

impl ClientStatus {
    /// Whether the client accepts updates and proofs
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Expired => f.write_str("Expired"),
            Self::Frozen => f.write_str("Frozen"),
        }
    }
}
