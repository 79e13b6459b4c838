//! Server -> Client message decoding.

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::action;
use crate::types::{optional_player_id, player_id};
use crate::{AvatarDescriptor, PlayerId, PlayerRecord, ProtocolError};

/// Reply to our own `join_game` request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "optional_player_id")]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub players: HashMap<PlayerId, PlayerRecord>,
    #[serde(default)]
    pub avatars: HashMap<String, AvatarDescriptor>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerJoined {
    pub player: PlayerRecord,
    pub avatar: AvatarDescriptor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayersMoved {
    pub players: HashMap<PlayerId, PlayerRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeft {
    #[serde(deserialize_with = "player_id")]
    pub player_id: PlayerId,
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    JoinGame(JoinResponse),
    PlayerJoined(PlayerJoined),
    PlayersMoved(PlayersMoved),
    PlayerLeft(PlayerLeft),
    /// Well-formed message with an `action` this client does not handle.
    Unknown(String),
}

impl ServerMessage {
    /// Decode one JSON text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
        Self::from_value(value)
    }

    /// Decode an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let name = value
            .get("action")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingAction)?
            .to_string();

        match name.as_str() {
            action::JOIN_GAME => payload(&name, value).map(ServerMessage::JoinGame),
            action::PLAYER_JOINED => payload(&name, value).map(ServerMessage::PlayerJoined),
            action::PLAYERS_MOVED => payload(&name, value).map(ServerMessage::PlayersMoved),
            action::PLAYER_LEFT => payload(&name, value).map(ServerMessage::PlayerLeft),
            _ => Ok(ServerMessage::Unknown(name)),
        }
    }

    /// The `action` this message was dispatched on.
    pub fn action(&self) -> &str {
        match self {
            ServerMessage::JoinGame(_) => action::JOIN_GAME,
            ServerMessage::PlayerJoined(_) => action::PLAYER_JOINED,
            ServerMessage::PlayersMoved(_) => action::PLAYERS_MOVED,
            ServerMessage::PlayerLeft(_) => action::PLAYER_LEFT,
            ServerMessage::Unknown(name) => name,
        }
    }
}

fn payload<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload {
        action: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Facing;

    #[test]
    fn test_join_accepted() {
        let text = r#"{"action":"join_game","success":true,"playerId":"p1",
            "players":{"p1":{"id":"p1","x":1000,"y":1000,"facing":"south","avatar":"a1"}},
            "avatars":{"a1":{"name":"a1","frames":{"south":["img0.png"]}}}}"#;
        let ServerMessage::JoinGame(join) = ServerMessage::decode(text).unwrap() else {
            panic!("expected join_game");
        };
        assert!(join.success);
        assert_eq!(join.player_id.as_deref(), Some("p1"));
        assert_eq!(join.players["p1"].facing, Facing::South);
        assert_eq!(join.avatars["a1"].frames["south"], vec!["img0.png".to_string()]);
        assert!(join.error.is_none());
    }

    #[test]
    fn test_join_rejected_without_player_data() {
        let text = r#"{"action":"join_game","success":false,"error":"name taken"}"#;
        let ServerMessage::JoinGame(join) = ServerMessage::decode(text).unwrap() else {
            panic!("expected join_game");
        };
        assert!(!join.success);
        assert!(join.player_id.is_none());
        assert!(join.players.is_empty());
        assert_eq!(join.error.as_deref(), Some("name taken"));
    }

    #[test]
    fn test_player_left_numeric_id() {
        let msg = ServerMessage::decode(r#"{"action":"player_left","playerId":42}"#).unwrap();
        assert_eq!(msg, ServerMessage::PlayerLeft(PlayerLeft { player_id: "42".into() }));
        assert_eq!(msg.action(), "player_left");
    }

    #[test]
    fn test_unknown_action_is_not_an_error() {
        let msg = ServerMessage::decode(r#"{"action":"chat","text":"hi"}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown("chat".into()));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ServerMessage::decode("{not json"),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_action() {
        assert!(matches!(
            ServerMessage::decode(r#"{"players":{}}"#),
            Err(ProtocolError::MissingAction)
        ));
        assert!(matches!(
            ServerMessage::decode(r#"{"action":5}"#),
            Err(ProtocolError::MissingAction)
        ));
    }

    #[test]
    fn test_invalid_payload_names_action() {
        let err = ServerMessage::decode(r#"{"action":"players_moved","players":[1,2]}"#).unwrap_err();
        match err {
            ProtocolError::InvalidPayload { action, .. } => assert_eq!(action, "players_moved"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
