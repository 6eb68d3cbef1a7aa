//! Connection lifecycle callbacks.
//!
//! The connection task calls these one at a time, in the order the socket
//! produces events. They translate socket events into store writes and never
//! fail: anything unexpected is logged and dropped.

use super::messages::{decode_server_message, ServerEvent};
use crate::store::GameStore;
use std::fmt::Display;
use tracing::{debug, error, info, warn};

pub struct ConnectionHandler {
    store: GameStore,
    client_id: String,
}

impl ConnectionHandler {
    pub fn new(store: GameStore, client_id: impl Into<String>) -> Self {
        Self {
            store,
            client_id: client_id.into(),
        }
    }

    pub fn on_open(&self) {
        info!("WebSocket connection opened for client {}", self.client_id);
        self.store.socket_connected().set(true);
    }

    pub fn on_message(&self, text: &str) {
        match decode_server_message(text) {
            Ok(ServerEvent::GameStateUpdate(state)) => {
                debug!(
                    "Received game state: {} players, {} log entries",
                    state.player_count(),
                    state.event_log.len()
                );
                self.store.game_state().set(state);
            }
            Ok(ServerEvent::Other { msg_type, payload }) => {
                debug!("Ignoring WebSocket message '{}': {}", msg_type, payload);
            }
            Err(e) => {
                warn!("Failed to parse WebSocket message: {} - {}", e, text);
            }
        }
    }

    pub fn on_close(&self) {
        info!("WebSocket connection closed for client {}", self.client_id);
        self.store.socket_connected().set(false);
    }

    pub fn on_error(&self, err: impl Display) {
        error!("WebSocket error for client {}: {}", self.client_id, err);
        self.store.socket_connected().set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameState, Player, Position};
    use serde_json::json;

    fn handler() -> (ConnectionHandler, GameStore) {
        let store = GameStore::new();
        (ConnectionHandler::new(store.clone(), "p1"), store)
    }

    fn populated_state() -> GameState {
        let mut state = GameState::default();
        state.players.insert(
            "old".to_string(),
            Player {
                id: "old".to_string(),
                name: "Old".to_string(),
                position: Position::new(4.0, 2.0),
                body_parts: Default::default(),
                inventory: vec![],
            },
        );
        state.event_log = vec!["old news".to_string()];
        state
    }

    #[test]
    fn open_sets_flag() {
        let (handler, store) = handler();
        assert!(!store.is_connected());
        handler.on_open();
        assert!(store.is_connected());
    }

    #[test]
    fn close_clears_flag() {
        let (handler, store) = handler();
        handler.on_open();
        handler.on_close();
        assert!(!store.is_connected());
    }

    #[test]
    fn error_clears_flag() {
        let (handler, store) = handler();
        handler.on_open();
        handler.on_error("connection reset");
        assert!(!store.is_connected());
    }

    #[test]
    fn game_state_update_replaces_snapshot() {
        let (handler, store) = handler();
        store.game_state().set(populated_state());

        let payload = json!({
            "world_objects": [],
            "players": {"p1": {"id": "p1", "name": "Player p1", "position": [0, 0], "body_parts": {}, "inventory": []}},
            "event_log": ["p1 joined"]
        });
        let text = json!({"type": "game_state_update", "payload": payload}).to_string();
        handler.on_message(&text);

        let state = store.game_state().get();
        let expected: GameState = serde_json::from_value(payload).unwrap();
        assert_eq!(state, expected);
        assert!(state.player("old").is_none());
        assert_eq!(state.player_count(), 1);
        assert_eq!(state.event_log, vec!["p1 joined"]);
    }

    #[test]
    fn other_message_types_leave_state_untouched() {
        let (handler, store) = handler();
        store.game_state().set(populated_state());

        handler.on_message(r#"{"type":"chat","payload":{"players":{}}}"#);

        assert_eq!(store.game_state().get(), populated_state());
    }

    #[test]
    fn malformed_messages_are_dropped() {
        let (handler, store) = handler();
        store.game_state().set(populated_state());
        let sub = store.game_state().subscribe();

        handler.on_message("{not json");
        handler.on_message(r#"{"type":"game_state_update","payload":{"players":{"x":{}}}}"#);
        handler.on_message(r#"{"type":"game_state_update","payload":[1,2,3]}"#);

        assert_eq!(store.game_state().get(), populated_state());
        assert!(!sub.has_changed());
    }

    #[test]
    fn messages_do_not_touch_connectivity() {
        let (handler, store) = handler();
        handler.on_message(r#"{"type":"game_state_update","payload":{}}"#);
        assert!(!store.is_connected());
    }
}
