//! This module defines [`ClientParams`].

use ibc_light_client_types::ClientType;
use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// Host parameters of the client router
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientParams {
    /// Client types new clients may be created for and messages may be routed to
    pub allowed_clients: Vec<ClientType>,
}

#[derive(Deserialize)]
struct RawClientParams {
    allowed_clients: Vec<String>,
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            allowed_clients: vec![ClientType::Tendermint, ClientType::SoloMachine],
        }
    }
}

impl ClientParams {
    /// Parses params from a JSON document such as `{"allowed_clients": ["07-tendermint"]}`
    /// # Errors
    /// Returns [`RouterError::InvalidParams`] if the document is malformed, and
    /// [`RouterError::UnknownClientType`] if it names an unsupported client type
    pub fn from_json(json: &str) -> Result<Self, RouterError> {
        let raw: RawClientParams = serde_json::from_str(json).map_err(RouterError::InvalidParams)?;

        let allowed_clients = raw
            .allowed_clients
            .iter()
            .map(|client_type| {
                client_type
                    .parse()
                    .map_err(|_| RouterError::UnknownClientType(client_type.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { allowed_clients })
    }

    /// Whether `client_type` is allowed
    #[must_use]
    pub fn is_allowed(&self, client_type: ClientType) -> bool {
        self.allowed_clients.contains(&client_type)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_allows_every_client_type() {
        let params = ClientParams::default();
        assert!(params.is_allowed(ClientType::Tendermint));
        assert!(params.is_allowed(ClientType::SoloMachine));
    }

    #[test]
    fn parses_allowed_clients() {
        let params = ClientParams::from_json(r#"{"allowed_clients": ["06-solomachine"]}"#).unwrap();
        assert_eq!(params.allowed_clients, vec![ClientType::SoloMachine]);
        assert!(!params.is_allowed(ClientType::Tendermint));
    }

    #[rstest]
    #[case::unknown_type(r#"{"allowed_clients": ["09-localhost"]}"#)]
    #[case::malformed(r#"{"allowed_clients": "07-tendermint"}"#)]
    #[case::missing_field("{}")]
    fn rejects_invalid_params(#[case] json: &str) {
        assert!(matches!(
            ClientParams::from_json(json),
            Err(RouterError::UnknownClientType(_) | RouterError::InvalidParams(_))
        ));
    }

    #[test]
    fn unknown_type_is_named() {
        let err = ClientParams::from_json(r#"{"allowed_clients": ["09-localhost"]}"#).unwrap_err();
        assert!(matches!(err, RouterError::UnknownClientType(t) if t == "09-localhost"));
    }
}
