//! Transports that carry encoded requests to the server
//!
//! The client never looks inside a transport: it hands over the encoded
//! request envelope and gets back the raw reply bytes, or a transport error it
//! passes to the caller untouched.
//!
//! Two implementations ship with the crate:
//!
//! - [`HttpTransport`]: one `POST` per call
//! - [`WsTransport`]: one long-lived WebSocket, calls multiplexed by id
//!
//! Anything else (a Unix socket, an in-process stub for tests) only needs to
//! implement [`Transport`].

use async_trait::async_trait;
use jrpc2_core::Result;

pub mod http;
pub mod ws;

pub use http::HttpTransport;
pub use ws::WsTransport;

/// Moves one encoded request to the server and brings the reply back
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` and return the raw reply
    ///
    /// `id` is the id inside `payload`. Transports that run several calls over
    /// one connection use it to match replies to callers; others ignore it.
    ///
    /// # Errors
    ///
    /// Only transport-level failures: `Error::Transport`, `Error::Http`,
    /// `Error::WebSocket` or `Error::ConnectionClosed`. The reply bytes are
    /// never interpreted here.
    async fn round_trip(&self, id: u64, payload: Vec<u8>) -> Result<Vec<u8>>;
}
