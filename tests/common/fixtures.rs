//! JSON payloads the fake server pushes to clients.

use serde_json::{json, Value};

/// Player entry as the game server sends it.
pub fn player_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Player {}", id),
        "position": [100.0, 200.0],
        "body_parts": { "hands": null, "feet": null, "body": null },
        "inventory": []
    })
}

/// A `game_state_update` frame with the given players and event log.
pub fn game_state_update(player_ids: &[&str], events: &[&str]) -> Value {
    let players: serde_json::Map<String, Value> = player_ids
        .iter()
        .map(|id| (id.to_string(), player_json(id)))
        .collect();

    json!({
        "type": "game_state_update",
        "payload": {
            "world_objects": [
                {
                    "id": "enemy_goblin",
                    "name": "Goblin Scout",
                    "position": [450.0, 800.0]
                }
            ],
            "players": players,
            "event_log": events
        }
    })
}
