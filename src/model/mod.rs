//! Game entity types as they travel on the wire.
//!
//! These mirror the server's JSON shapes. Every collection field defaults to
//! empty when it is missing from a payload, so older server builds that omit
//! e.g. `grid` still decode.

mod command;
mod game_state;

pub use command::PlayerCommand;
pub use game_state::{BodyParts, GameState, Item, Player, Position, Tile, WorldObject};
