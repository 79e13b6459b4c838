//! Client -> Server intents.

use serde::{Deserialize, Serialize};

use crate::{MoveDirection, ProtocolError};

/// An outbound request expressing what the local player wants to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientIntent {
    /// Enter the game under a display name.
    JoinGame { username: String },
    /// Start moving in a direction until told otherwise.
    Move { direction: MoveDirection },
    /// Stop moving.
    Stop,
}

impl ClientIntent {
    /// Serialize to the JSON text frame sent over the socket.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn encoded(intent: ClientIntent) -> Value {
        serde_json::from_str(&intent.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_join_game_shape() {
        let value = encoded(ClientIntent::JoinGame { username: "alice".into() });
        assert_eq!(value, json!({"action": "join_game", "username": "alice"}));
    }

    #[test]
    fn test_move_shape() {
        let value = encoded(ClientIntent::Move { direction: MoveDirection::Up });
        assert_eq!(value, json!({"action": "move", "direction": "up"}));
    }

    #[test]
    fn test_stop_shape() {
        assert_eq!(encoded(ClientIntent::Stop), json!({"action": "stop"}));
    }
}
