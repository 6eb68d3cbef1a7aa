//! Owner of the single game server connection.
//!
//! [`GameClient`] holds at most one live connection. The socket itself lives
//! in a spawned task that feeds lifecycle events to a [`ConnectionHandler`]
//! and drains an outbound queue; the client only keeps the sending half of
//! that queue.

use super::handler::ConnectionHandler;
use super::messages::encode_command;
use crate::config::Endpoint;
use crate::model::PlayerCommand;
use crate::store::GameStore;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// How long [`GameClient::disconnect`] waits for the close handshake.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Error type for send operations.
#[derive(Debug, Error)]
pub enum SendError {
    /// No open connection; the command was dropped.
    #[error("WebSocket is not connected")]
    NotConnected,
    /// The connection went away while the command was being queued.
    #[error("WebSocket connection was closed")]
    Disconnected,
    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of [`GameClient::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new connection is being established.
    Started,
    /// A connection is already open or opening; nothing was done.
    AlreadyConnected,
}

/// Socket phase, shared between a [`Connection`] and its task.
#[derive(Default)]
struct SocketFlags {
    /// Set after a successful handshake, cleared when the socket ends.
    open: AtomicBool,
    /// Set once the socket is gone, before the handler hears about it.
    finished: AtomicBool,
}

struct Connection {
    client_id: String,
    outbound: mpsc::UnboundedSender<Message>,
    flags: Arc<SocketFlags>,
    task: JoinHandle<()>,
}

impl Connection {
    /// Handshake in flight or socket open.
    fn is_live(&self) -> bool {
        !self.flags.finished.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    fn is_open(&self) -> bool {
        self.flags.open.load(Ordering::SeqCst) && self.is_live()
    }
}

/// Client for the game server WebSocket.
pub struct GameClient {
    endpoint: Endpoint,
    store: GameStore,
    connection: Mutex<Option<Connection>>,
}

impl GameClient {
    pub fn new(endpoint: Endpoint, store: GameStore) -> Self {
        Self {
            endpoint,
            store,
            connection: Mutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Check if the WebSocket is currently connected.
    pub fn is_connected(&self) -> bool {
        self.store.is_connected()
    }

    /// Identifier the live connection was opened with, if any.
    pub fn client_id(&self) -> Option<String> {
        self.lock_connection()
            .as_ref()
            .filter(|c| c.is_live())
            .map(|c| c.client_id.clone())
    }

    /// Start connecting as `client_id`.
    ///
    /// Returns immediately; the handshake completes in the background and is
    /// reported through the store's connectivity flag. While a connection is
    /// open or opening this does nothing, even for a different `client_id`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self, client_id: &str) -> ConnectOutcome {
        let mut slot = self.lock_connection();

        if let Some(existing) = slot.as_ref().filter(|c| c.is_live()) {
            if existing.client_id != client_id {
                warn!(
                    "Ignoring connect as '{}': already connected as '{}'",
                    client_id, existing.client_id
                );
            } else {
                debug!("Already connected as '{}'", client_id);
            }
            return ConnectOutcome::AlreadyConnected;
        }

        let url = self.endpoint.ws_url(client_id);
        info!("Connecting to game server WebSocket: {}", url);

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let flags = Arc::new(SocketFlags::default());
        let handler = ConnectionHandler::new(self.store.clone(), client_id);
        let task = tokio::spawn(run_connection(url, handler, flags.clone(), outbound_rx));

        *slot = Some(Connection {
            client_id: client_id.to_string(),
            outbound,
            flags,
            task,
        });

        ConnectOutcome::Started
    }

    /// Send a command built from a name and arguments.
    ///
    /// Exactly one frame is queued if the socket is open. Otherwise the command
    /// is dropped, logged, and [`SendError::NotConnected`] is returned; nothing
    /// is queued for later.
    pub fn send_command<I, S>(&self, command: impl Into<String>, args: I) -> Result<(), SendError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(&PlayerCommand::new(command, args))
    }

    pub fn send(&self, command: &PlayerCommand) -> Result<(), SendError> {
        let slot = self.lock_connection();
        let Some(connection) = slot.as_ref().filter(|c| c.is_open()) else {
            error!(
                "WebSocket is not connected, dropping command '{}'",
                command.command
            );
            return Err(SendError::NotConnected);
        };

        let frame = encode_command(command)?;
        connection
            .outbound
            .send(Message::text(frame))
            .map_err(|_| {
                error!(
                    "WebSocket closed while sending command '{}'",
                    command.command
                );
                SendError::Disconnected
            })
    }

    /// Close the connection, if any.
    ///
    /// Sends a close frame and waits briefly for the server to acknowledge it
    /// before tearing the task down. The connectivity flag is false afterwards.
    pub async fn disconnect(&self) {
        let Some(connection) = self.lock_connection().take() else {
            return;
        };

        info!("Disconnecting client {}", connection.client_id);
        connection.flags.open.store(false, Ordering::SeqCst);
        let _ = connection.outbound.send(Message::Close(None));
        drop(connection.outbound);

        let mut task = connection.task;
        match tokio::time::timeout(CLOSE_TIMEOUT, &mut task).await {
            Ok(Ok(())) => {}
            Ok(Err(join_err)) => {
                warn!("Connection task terminated with join error: {}", join_err);
            }
            Err(_) => {
                warn!("Connection task did not exit within timeout; aborting");
                task.abort();
            }
        }

        self.store.socket_connected().set(false);
    }

    fn lock_connection(&self) -> MutexGuard<'_, Option<Connection>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        let slot = self
            .connection
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(connection) = slot.take() {
            connection.task.abort();
        }
    }
}

/// Drives one socket from handshake to close.
async fn run_connection(
    url: String,
    handler: ConnectionHandler,
    flags: Arc<SocketFlags>,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            flags.finished.store(true, Ordering::SeqCst);
            handler.on_error(format!("connection to {} failed: {}", url, e));
            handler.on_close();
            return;
        }
    };

    flags.open.store(true, Ordering::SeqCst);
    handler.on_open();

    let (mut write, mut read) = ws_stream.split();
    let mut closing = false;

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => handler.on_message(text.as_str()),
                Some(Ok(Message::Ping(data))) => {
                    if let Err(e) = write.send(Message::Pong(data)).await {
                        handler.on_error(format!("failed to send pong: {}", e));
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("WebSocket closed by server: {:?}", frame);
                    break;
                }
                Some(Ok(Message::Binary(data))) => {
                    debug!("Ignoring binary WebSocket frame ({} bytes)", data.len());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    handler.on_error(e);
                    break;
                }
                None => break,
            },
            outgoing = outbound_rx.recv(), if !closing => {
                // The client dropped its sender: close politely.
                let message = outgoing.unwrap_or(Message::Close(None));
                closing = matches!(message, Message::Close(_));
                if let Err(e) = write.send(message).await {
                    handler.on_error(e);
                    break;
                }
            }
        }
    }

    flags.open.store(false, Ordering::SeqCst);
    flags.finished.store(true, Ordering::SeqCst);
    handler.on_close();
}
