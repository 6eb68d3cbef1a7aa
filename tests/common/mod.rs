//! Common test infrastructure
//!
//! A fake game server plus payload builders. Tests should only import from
//! this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{connected_client, game_state_update};
//!
//! #[tokio::test]
//! async fn test_receive_world() {
//!     let (server, client, mut conn) = connected_client("p1").await;
//!     conn.send_json(&game_state_update(&["p1"], &[])).await;
//! }
//! ```

mod fixtures;
mod server;

pub use fixtures::*;
pub use server::{ServerConnection, TestServer};

use agentic_rpg_client::store::GameStore;
use agentic_rpg_client::{ConnectOutcome, Endpoint, GameClient};
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound for anything a test waits on.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Waits until the store's connectivity flag equals `expected`.
pub async fn wait_for_connected(store: &GameStore, expected: bool) -> bool {
    let mut updates = store.socket_connected().subscribe();
    let reached = timeout(WAIT_TIMEOUT, async {
        loop {
            if updates.latest() == expected {
                return true;
            }
            if updates.changed().await.is_none() {
                return false;
            }
        }
    })
    .await;

    reached.unwrap_or(false)
}

/// Spawns a server, connects a client to it as `client_id`, and waits until
/// both ends see the connection.
pub async fn connected_client(client_id: &str) -> (TestServer, GameClient, ServerConnection) {
    let mut server = TestServer::spawn().await;
    let endpoint = Endpoint::parse(&server.base_url).expect("Invalid test server url");
    let client = GameClient::new(endpoint, GameStore::new());

    assert_eq!(client.connect(client_id), ConnectOutcome::Started);

    let conn = server
        .next_connection(WAIT_TIMEOUT)
        .await
        .expect("Client never reached the test server");
    assert!(
        wait_for_connected(client.store(), true).await,
        "Client never reported the connection as open"
    );

    (server, client, conn)
}
