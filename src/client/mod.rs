//! WebSocket transport to the game server.
//!
//! Incoming `game_state_update` frames replace the store's snapshot; outbound
//! player commands are written only while the socket is open. Failures are
//! logged and absorbed, and there is no automatic reconnection.

pub mod connection;
pub mod handler;
pub mod messages;

pub use connection::{ConnectOutcome, GameClient, SendError};
pub use handler::ConnectionHandler;
pub use messages::{decode_server_message, msg_types, DecodeError, ServerEvent, ServerMessage};
