//! WebSocket message types.
//!
//! Inbound frames use a generic `{type, payload}` envelope; the payload is
//! kept as a JSON value until the type is known, then decoded into a typed
//! [`ServerEvent`]. Outbound frames are the bare [`PlayerCommand`].

use crate::model::{GameState, PlayerCommand};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server -> Client message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    /// Message type identifier (e.g. "game_state_update").
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Type-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ServerMessage {
    pub fn new(msg_type: impl Into<String>, payload: impl Serialize) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Reserved message type constants.
pub mod msg_types {
    /// Full snapshot of the world (server -> client).
    pub const GAME_STATE_UPDATE: &str = "game_state_update";
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Replaces the whole game state.
    GameStateUpdate(GameState),
    /// Any message type this client does not act on.
    Other {
        msg_type: String,
        payload: serde_json::Value,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed message envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Invalid payload for '{msg_type}': {source}")]
    Payload {
        msg_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes an inbound text frame.
///
/// Fails closed: a known message type whose payload does not match its schema
/// is an error, never a partially filled value.
pub fn decode_server_message(text: &str) -> Result<ServerEvent, DecodeError> {
    let message: ServerMessage = serde_json::from_str(text).map_err(DecodeError::Envelope)?;

    match message.msg_type.as_str() {
        msg_types::GAME_STATE_UPDATE => serde_json::from_value::<GameState>(message.payload)
            .map(ServerEvent::GameStateUpdate)
            .map_err(|source| DecodeError::Payload {
                msg_type: message.msg_type,
                source,
            }),
        _ => Ok(ServerEvent::Other {
            msg_type: message.msg_type,
            payload: message.payload,
        }),
    }
}

/// Serializes an outbound command frame.
pub fn encode_command(command: &PlayerCommand) -> Result<String, serde_json::Error> {
    serde_json::to_string(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_deserializes_correctly() {
        let json = r#"{"type":"test_type","payload":{"key":"value"}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();

        assert_eq!(msg.msg_type, "test_type");
        assert_eq!(msg.payload["key"], "value");
    }

    #[test]
    fn server_message_serializes_type_field() {
        let msg = ServerMessage::new(msg_types::GAME_STATE_UPDATE, GameState::default());
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("\"type\":\"game_state_update\""));
        assert!(json.contains("\"players\":{}"));
    }

    #[test]
    fn decodes_game_state_update() {
        let text = json!({
            "type": "game_state_update",
            "payload": {
                "world_objects": [],
                "players": {"p1": {"id": "p1", "name": "Player p1", "position": [0, 0], "body_parts": {}, "inventory": []}},
                "event_log": ["p1 joined"]
            }
        })
        .to_string();

        match decode_server_message(&text).unwrap() {
            ServerEvent::GameStateUpdate(state) => {
                assert_eq!(state.player_count(), 1);
                assert!(state.player("p1").is_some());
                assert_eq!(state.event_log, vec!["p1 joined"]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn unknown_type_is_other() {
        let event = decode_server_message(r#"{"type":"chat","payload":{"text":"hi"}}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Other {
                msg_type: "chat".to_string(),
                payload: json!({"text": "hi"}),
            }
        );
    }

    #[test]
    fn missing_payload_defaults_to_null() {
        let event = decode_server_message(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Other {
                msg_type: "ping".to_string(),
                payload: serde_json::Value::Null,
            }
        );
    }

    #[test]
    fn non_json_is_envelope_error() {
        let err = decode_server_message("not json").unwrap_err();
        assert!(matches!(err, DecodeError::Envelope(_)));
    }

    #[test]
    fn missing_type_is_envelope_error() {
        let err = decode_server_message(r#"{"payload":{}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Envelope(_)));
    }

    #[test]
    fn bad_snapshot_payload_fails_closed() {
        // Player entry is missing its position
        let text = r#"{"type":"game_state_update","payload":{"players":{"p1":{"id":"p1","name":"x"}}}}"#;
        let err = decode_server_message(text).unwrap_err();
        match err {
            DecodeError::Payload { msg_type, .. } => assert_eq!(msg_type, "game_state_update"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn null_snapshot_payload_fails_closed() {
        let err = decode_server_message(r#"{"type":"game_state_update"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Payload { .. }));
    }

    #[test]
    fn encode_command_matches_wire_format() {
        let frame = encode_command(&PlayerCommand::new("move", ["north", "2"])).unwrap();
        assert_eq!(frame, r#"{"command":"move","args":["north","2"]}"#);
    }
}
