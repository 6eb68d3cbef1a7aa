//! Plain-text views of a game snapshot.
//!
//! Pure formatting only; styling for the terminal lives in the binary.

use crate::model::{GameState, Player, Position, WorldObject};

/// A titled block of lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

fn position_text(position: &Position) -> String {
    format!("({}, {})", position.x(), position.y())
}

pub fn player_line(player: &Player) -> String {
    let mut line = format!(
        "{} [{}] at {}",
        player.name,
        player.id,
        position_text(&player.position)
    );

    for (slot, item) in player.body_parts.equipped() {
        line.push_str(&format!("; {}: {}", slot, item.name));
    }

    match player.inventory.len() {
        0 => line.push_str("; inventory: empty"),
        1 => line.push_str(&format!("; inventory: {}", player.inventory[0].name)),
        n => line.push_str(&format!("; inventory: {} items", n)),
    }

    line
}

pub fn world_object_line(object: &WorldObject) -> String {
    format!(
        "{} [{}] at {}",
        object.name,
        object.id,
        position_text(&object.position)
    )
}

/// Players, world objects, and the last `log_lines` events.
pub fn snapshot_sections(state: &GameState, log_lines: usize) -> Vec<Section> {
    let players = Section {
        title: format!("Players ({})", state.player_count()),
        lines: state.players.values().map(player_line).collect(),
    };

    let objects = Section {
        title: format!("World objects ({})", state.world_objects.len()),
        lines: state.world_objects.iter().map(world_object_line).collect(),
    };

    let events = state.latest_events(log_lines);
    let events = Section {
        title: if events.len() < state.event_log.len() {
            format!("Events (last {} of {})", events.len(), state.event_log.len())
        } else {
            format!("Events ({})", events.len())
        },
        lines: events.to_vec(),
    };

    vec![players, objects, events]
}

/// The snapshot as a single block of text.
pub fn render_snapshot(state: &GameState, log_lines: usize) -> String {
    let mut out = String::new();
    for section in snapshot_sections(state, log_lines) {
        out.push_str(&section.title);
        out.push('\n');
        if section.lines.is_empty() {
            out.push_str("  (none)\n");
        }
        for line in &section.lines {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
