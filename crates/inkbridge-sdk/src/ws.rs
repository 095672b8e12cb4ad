//! WebSocket JSON-RPC transport

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream};

use crate::transport::{request_body, JsonRpcResponse, Transport};
use crate::SdkError;

type WebSocketStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingRequest = oneshot::Sender<Result<Value, SdkError>>;

struct Request {
    id: u64,
    body: String,
    tx: PendingRequest,
}

/// Handle to an established WebSocket connection
///
/// Requests are multiplexed over one socket by a background task that
/// matches responses to callers by request id.
pub struct WsTransport {
    next_id: AtomicU64,
    request_tx: mpsc::UnboundedSender<Request>,
}

impl WsTransport {
    /// Connect to the node at `url`
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| SdkError::Transport(format!("failed to connect to {}: {}", url, e)))?;
        tracing::debug!(%url, "websocket connected");

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        tokio::spawn(WsServer::new(stream).run(request_rx));

        Ok(Self {
            next_id: AtomicU64::new(1),
            request_tx,
        })
    }

    /// Returns `true` while the background task is alive
    pub fn ready(&self) -> bool {
        !self.request_tx.is_closed()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = request_body(id, method, params).to_string();

        let (tx, rx) = oneshot::channel();
        self.request_tx
            .send(Request { id, body, tx })
            .map_err(|_| server_exit())?;

        rx.await.map_err(|_| server_exit())?
    }
}

struct WsServer {
    pending: HashMap<u64, PendingRequest>,
    stream: WebSocketStream,
}

impl WsServer {
    fn new(stream: WebSocketStream) -> Self {
        Self {
            pending: HashMap::with_capacity(64),
            stream,
        }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Request>) {
        let res = loop {
            tokio::select! {
                biased;
                request = rx.recv() => match request {
                    Some(request) => {
                        if let Err(e) = self.handle_request(request).await {
                            break Err(e);
                        }
                    }
                    // handle dropped
                    None => break Ok(()),
                },
                msg = self.stream.next() => match msg {
                    Some(Ok(msg)) => match self.handle_message(msg).await {
                        Ok(true) => break Ok(()),
                        Ok(false) => {}
                        Err(e) => break Err(e),
                    },
                    Some(Err(e)) => break Err(SdkError::Transport(e.to_string())),
                    None => break Ok(()),
                },
            }
        };

        if let Err(e) = res {
            tracing::error!(err = %e, "exiting websocket task due to error");
        }

        // fail whatever is still waiting
        for (_, tx) in self.pending.drain() {
            let _ = tx.send(Err(server_exit()));
        }
    }

    async fn handle_request(&mut self, request: Request) -> Result<(), SdkError> {
        self.pending.insert(request.id, request.tx);
        self.stream
            .send(Message::Text(request.body))
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))
    }

    /// Returns `Ok(true)` when the peer closed the socket
    async fn handle_message(&mut self, msg: Message) -> Result<bool, SdkError> {
        match msg {
            Message::Text(text) => self.handle_text(&text),
            Message::Ping(ping) => {
                self.stream
                    .send(Message::Pong(ping))
                    .await
                    .map_err(|e| SdkError::Transport(e.to_string()))?;
            }
            Message::Close(_) => return Ok(true),
            Message::Frame(_) | Message::Binary(_) | Message::Pong(_) => {}
        }
        Ok(false)
    }

    fn handle_text(&mut self, text: &str) {
        let response: JsonRpcResponse = match serde_json::from_str(text) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(err = %e, "ignoring malformed websocket message");
                return;
            }
        };

        // subscription notifications carry no id
        let Some(id) = response.id else {
            return;
        };

        match self.pending.remove(&id) {
            // if send fails, request has been dropped at the callsite
            Some(tx) => {
                let _ = tx.send(response.into_result());
            }
            None => tracing::warn!(%id, "no pending request exists for response ID"),
        }
    }
}

fn server_exit() -> SdkError {
    SdkError::Transport("websocket connection closed".to_string())
}
