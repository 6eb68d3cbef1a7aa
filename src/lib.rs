//! Client for an Agentic RPG game server.
//!
//! The [`client::GameClient`] keeps one WebSocket open to the server, applies
//! every world snapshot it receives to a [`store::GameStore`], and forwards
//! player commands while the socket is open.

pub mod client;
pub mod config;
pub mod health;
pub mod model;
pub mod render;
pub mod store;

pub use client::{ConnectOutcome, GameClient, SendError};
pub use config::{AppConfig, Endpoint};
pub use model::{GameState, PlayerCommand};
pub use store::GameStore;
