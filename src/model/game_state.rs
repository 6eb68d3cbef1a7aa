use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 2D coordinate pair, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub f64, pub f64);

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }
}

/// Something a player can carry or wear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub name: String,
    pub description: String,
    /// Visual glyph (inline SVG markup).
    pub svg: String,
}

/// Equipment slots. An empty slot is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BodyParts {
    #[serde(default)]
    pub hands: Option<Item>,
    #[serde(default)]
    pub feet: Option<Item>,
    #[serde(default)]
    pub body: Option<Item>,
}

impl BodyParts {
    /// Occupied slots as `(slot name, item)`, in hands/feet/body order.
    pub fn equipped(&self) -> Vec<(&'static str, &Item)> {
        [
            ("hands", self.hands.as_ref()),
            ("feet", self.feet.as_ref()),
            ("body", self.body.as_ref()),
        ]
        .into_iter()
        .filter_map(|(slot, item)| item.map(|item| (slot, item)))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub body_parts: BodyParts,
    #[serde(default)]
    pub inventory: Vec<Item>,
}

/// A non-player thing placed in the world (quests, enemies, props).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldObject {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

/// One cell of the world grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: String,
    pub svg: String,
    #[serde(default)]
    pub entities: Vec<Player>,
}

/// Full world snapshot as last received from the server.
///
/// Snapshots are only ever replaced as a whole; there is no field-level merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    #[serde(default)]
    pub world_objects: Vec<WorldObject>,
    #[serde(default)]
    pub players: BTreeMap<String, Player>,
    #[serde(default)]
    pub event_log: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<Vec<Tile>>,
}

impl GameState {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The last `count` log entries, oldest first.
    pub fn latest_events(&self, count: usize) -> &[String] {
        let start = self.event_log.len().saturating_sub(count);
        &self.event_log[start..]
    }
}
