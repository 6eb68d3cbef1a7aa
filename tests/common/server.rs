//! Fake game server
//!
//! Accepts WebSocket upgrades on a random local port and hands each accepted
//! socket to the test, which then plays the server's side by hand.

use agentic_rpg_client::model::PlayerCommand;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

/// Test server instance listening on `127.0.0.1`.
///
/// When dropped, the accept loop stops. Already accepted connections live
/// as long as their [`ServerConnection`].
pub struct TestServer {
    /// WebSocket base URL (e.g., "ws://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    connections: mpsc::UnboundedReceiver<ServerConnection>,
    accept_task: JoinHandle<()>,
}

impl TestServer {
    /// Binds to a random port and starts accepting WebSocket upgrades.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (tx, connections) = mpsc::unbounded_channel();
        let accept_task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(conn) = ServerConnection::accept(stream).await {
                        let _ = tx.send(conn);
                    }
                });
            }
        });

        Self {
            base_url: format!("ws://127.0.0.1:{}", port),
            port,
            connections,
            accept_task,
        }
    }

    /// Next upgraded connection, or `None` if none arrives in time.
    pub async fn next_connection(&mut self, wait: Duration) -> Option<ServerConnection> {
        timeout(wait, self.connections.recv()).await.ok().flatten()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Server side of one client socket.
pub struct ServerConnection {
    /// Request path the client upgraded on, e.g. `/ws/p1`.
    pub path: String,
    ws: WebSocketStream<TcpStream>,
}

impl ServerConnection {
    async fn accept(stream: TcpStream) -> Option<Self> {
        let mut path = String::new();
        let record_path = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            path = request.uri().path().to_string();
            Ok(response)
        };
        let ws = accept_hdr_async(stream, record_path).await.ok()?;
        Some(Self { path, ws })
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send frame to client");
    }

    pub async fn send_json(&mut self, value: &Value) {
        self.send_text(&value.to_string()).await;
    }

    /// Next frame from the client. `None` on timeout or once the socket ended.
    pub async fn recv_frame(&mut self, wait: Duration) -> Option<Message> {
        match timeout(wait, self.ws.next()).await {
            Ok(Some(Ok(frame))) => Some(frame),
            _ => None,
        }
    }

    /// Next command the client sent, skipping control frames.
    pub async fn recv_command(&mut self, wait: Duration) -> Option<PlayerCommand> {
        loop {
            match self.recv_frame(wait).await? {
                Message::Text(text) => {
                    return Some(
                        serde_json::from_str(text.as_str()).expect("Client sent malformed command"),
                    )
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    /// Starts the close handshake from the server side.
    pub async fn close(&mut self) {
        self.ws
            .close(None)
            .await
            .expect("Failed to close WebSocket");
    }
}
