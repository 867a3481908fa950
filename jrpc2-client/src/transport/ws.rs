//! WebSocket transport
//!
//! One connection carries every call. Requests go out through a shared sink;
//! a background task reads replies and routes each one to its caller by the
//! reply's `id`. Frames without a numeric id (server notifications, garbage)
//! have no caller and are dropped.
//!
//! # Connection Loss
//!
//! When the server closes the socket or a read fails, every waiting call fails
//! with `Error::ConnectionClosed`, and so does every call made afterwards.
//! There is no reconnection.
//!
//! # Timeouts and Cancellation
//!
//! A call that gets no reply within the configured timeout fails with
//! `Error::Transport`. Whether it times out or the caller drops the future, its
//! entry in the pending table is removed; a reply arriving later is dropped.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use jrpc2_core::{codec, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::{AUTHORIZATION, USER_AGENT};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::config::ClientConfig;
use crate::request::PendingRequests;
use crate::transport::Transport;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// JSON-RPC over a WebSocket connection
pub struct WsTransport {
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
    pending: PendingRequests,
    receiver: JoinHandle<()>,
    timeout: Duration,
}

impl WsTransport {
    /// Open a connection to `config.base_url`
    ///
    /// The handshake carries the configured `User-Agent` and, when a token is
    /// set, an `Authorization: Bearer` header.
    ///
    /// # Errors
    ///
    /// `Error::Transport` for a URL that is not `ws`/`wss`, a header value
    /// that cannot be sent, or a handshake that outlasts `config.timeout`;
    /// `Error::WebSocket` if the handshake fails.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| Error::Transport(format!("Invalid base URL {}: {}", config.base_url, e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::Transport(format!(
                "Invalid scheme for WebSocket transport: {}",
                url.scheme()
            )));
        }

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| Error::WebSocket(e.to_string()))?;
        let headers = request.headers_mut();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        if let Some(token) = &config.auth_token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }

        tracing::info!(url = %url, "Connecting to server");
        let (ws_stream, _) = tokio::time::timeout(config.timeout, connect_async(request))
            .await
            .map_err(|_| Error::Transport(format!("handshake timed out after {:?}", config.timeout)))?
            .map_err(|e| Error::WebSocket(e.to_string()))?;
        tracing::info!("Connected successfully");

        let (sink, stream) = ws_stream.split();
        let pending = PendingRequests::new();
        let receiver = tokio::spawn(receive_loop(stream, pending.clone()));

        Ok(Self {
            sink: Arc::new(Mutex::new(sink)),
            pending,
            receiver,
            timeout: config.timeout,
        })
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::Transport(format!("Invalid header value: {}", e)))
}

#[async_trait]
impl Transport for WsTransport {
    async fn round_trip(&self, id: u64, payload: Vec<u8>) -> Result<Vec<u8>> {
        let text = String::from_utf8(payload).map_err(|e| Error::Serialization(e.to_string()))?;

        // Register before sending so a fast reply cannot be missed. The
        // registration is released however this future ends.
        let mut registration = self.pending.register(id)?;

        if let Err(e) = self.sink.lock().await.send(Message::Text(text)).await {
            tracing::warn!(id, error = %e, "Failed to send request");
            return Err(Error::WebSocket(e.to_string()));
        }
        tracing::trace!(id, "Request sent, waiting for response");

        match tokio::time::timeout(self.timeout, registration.reply()).await {
            Ok(reply) => reply,
            Err(_) => {
                tracing::warn!(id, timeout = ?self.timeout, "No response before timeout");
                Err(Error::Transport(format!("request timed out after {:?}", self.timeout)))
            }
        }
    }
}

/// Read frames until the connection ends, routing replies by id
async fn receive_loop(mut stream: SplitStream<WsStream>, pending: PendingRequests) {
    while let Some(frame) = stream.next().await {
        let bytes = match frame {
            Ok(Message::Text(text)) => text.into_bytes(),
            Ok(Message::Binary(data)) => data,
            Ok(Message::Close(frame)) => {
                tracing::info!(frame = ?frame, "Server closed the connection");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "WebSocket read failed");
                break;
            }
        };

        match reply_id(&bytes) {
            Some(id) => {
                if !pending.complete(id, bytes) {
                    tracing::debug!(id, "Dropping reply for unknown request id");
                }
            }
            None => tracing::debug!(bytes = bytes.len(), "Dropping frame without a numeric id"),
        }
    }

    pending.close(Error::ConnectionClosed);
}

fn reply_id(frame: &[u8]) -> Option<u64> {
    codec::decode_envelope(frame).ok()?.numeric_id()
}
