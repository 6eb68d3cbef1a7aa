//! Observable state shared between the transport and its consumers.
//!
//! A [`GameStore`] holds two independent cells: the latest [`GameState`]
//! snapshot and the socket connectivity flag. Stores are plain values that get
//! passed to whoever needs them; clones share the same cells.

mod cell;

pub use cell::{StoreCell, StoreSubscription};

use crate::model::GameState;
use std::sync::Arc;

struct GameStoreInner {
    game_state: StoreCell<GameState>,
    socket_connected: StoreCell<bool>,
}

/// Handle to the game state and connectivity cells.
#[derive(Clone)]
pub struct GameStore {
    inner: Arc<GameStoreInner>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    /// Empty world, not connected.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GameStoreInner {
                game_state: StoreCell::new(GameState::default()),
                socket_connected: StoreCell::new(false),
            }),
        }
    }

    pub fn game_state(&self) -> &StoreCell<GameState> {
        &self.inner.game_state
    }

    pub fn socket_connected(&self) -> &StoreCell<bool> {
        &self.inner.socket_connected
    }

    pub fn is_connected(&self) -> bool {
        self.inner.socket_connected.get()
    }
}
