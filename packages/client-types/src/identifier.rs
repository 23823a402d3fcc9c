//! This module defines [`ClientId`], [`ClientType`] and chain identifier helpers.

use std::{fmt, str::FromStr};

use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};

use crate::error::ClientTypesError;

const CLIENT_ID_MIN_LENGTH: usize = 9;
const CLIENT_ID_MAX_LENGTH: usize = 64;

/// The fixed set of supported light client kinds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientType {
    /// BFT consensus light client
    #[serde(rename = "07-tendermint")]
    Tendermint,
    /// Single signing authority client
    #[serde(rename = "06-solomachine")]
    SoloMachine,
}

impl ClientType {
    /// The canonical string tag of the client type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tendermint => "07-tendermint",
            Self::SoloMachine => "06-solomachine",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = ClientTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "07-tendermint" => Ok(Self::Tendermint),
            "06-solomachine" => Ok(Self::SoloMachine),
            other => Err(ClientTypesError::UnknownClientType(other.to_string())),
        }
    }
}

/// Identifier of a client instance, e.g. `07-tendermint-0`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Builds the identifier `{client_type}-{counter}`
    #[must_use]
    pub fn new(client_type: ClientType, counter: u64) -> Self {
        Self(format!("{client_type}-{counter}"))
    }

    /// The identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The client type encoded in the identifier prefix, if any
    #[must_use]
    pub fn client_type(&self) -> Option<ClientType> {
        let (prefix, counter) = self.0.rsplit_once('-')?;
        if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClientId {
    type Err = ClientTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ClientTypesError::InvalidIdentifier {
            id: s.to_string(),
            reason,
        };

        ensure!(
            (CLIENT_ID_MIN_LENGTH..=CLIENT_ID_MAX_LENGTH).contains(&s.len()),
            invalid(format!(
                "length must be between {CLIENT_ID_MIN_LENGTH} and {CLIENT_ID_MAX_LENGTH}"
            ))
        );
        ensure!(
            s.chars().all(is_identifier_char),
            invalid("must only contain alphanumerics and `._+-#[]<>`".to_string())
        );

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ClientId {
    type Error = ClientTypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}

/// Whether the chain identifier carries an epoch suffix, i.e. `{name}-{epoch}` where the epoch
/// has no leading zero and the name does not end with `-`.
#[must_use]
pub fn is_epoch_format(chain_id: &str) -> bool {
    let Some((name, epoch)) = chain_id.rsplit_once('-') else {
        return false;
    };

    !name.is_empty()
        && !name.ends_with('-')
        && epoch.starts_with(|c: char| ('1'..='9').contains(&c))
        && epoch.bytes().all(|b| b.is_ascii_digit())
}

/// Parses the epoch out of a chain identifier. Identifiers that are not in epoch format, or
/// whose epoch does not fit a `u64`, belong to epoch zero.
#[must_use]
pub fn parse_chain_id_epoch(chain_id: &str) -> u64 {
    if !is_epoch_format(chain_id) {
        return 0;
    }

    chain_id
        .rsplit_once('-')
        .and_then(|(_, epoch)| epoch.parse().ok())
        .unwrap_or_default()
}
