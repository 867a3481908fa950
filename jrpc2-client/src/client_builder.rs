//! Client builder
//!
//! The `ClientBuilder` collects the configuration and picks the transport:
//!
//! - [`build`](ClientBuilder::build) for an `http://` or `https://` endpoint
//! - [`connect`](ClientBuilder::connect) for a `ws://` or `wss://` endpoint
//! - [`with_transport`](ClientBuilder::with_transport) for anything else
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrpc2_client::ClientBuilder;
//!
//! # async fn example() -> jrpc2_core::Result<()> {
//! // Over HTTP
//! let client = ClientBuilder::new("https://node.example.com/rpc")
//!     .user_agent("wallet/2.1")
//!     .auth_token("s3cret")
//!     .build()?;
//!
//! // Over WebSocket
//! let client2 = ClientBuilder::new("ws://localhost:8080")
//!     .connect()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use jrpc2_core::{Logger, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::id::{IdGenerator, SequentialIds};
use crate::transport::{HttpTransport, Transport, WsTransport};
use crate::Client;

/// Builder for configuring and creating a [`Client`]
pub struct ClientBuilder {
    config: ClientConfig,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl ClientBuilder {
    /// Create a new client builder for `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Start from an existing configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config, ids: None }
    }

    /// Set the `User-Agent` header value
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Authenticate every request with a bearer token
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.with_auth_token(token);
        self
    }

    /// Send log events to `logger`
    pub fn logger(mut self, logger: Logger) -> Self {
        self.config = self.config.with_logger(logger);
        self
    }

    /// Give up on a call (or a WebSocket handshake) after `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Use a custom id generator instead of a counter starting at 1
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Create a client that talks HTTP
    pub fn build(self) -> Result<Client> {
        let transport = HttpTransport::new(&self.config)?;
        Ok(self.with_transport(transport))
    }

    /// Open a WebSocket and create a client on top of it
    pub async fn connect(self) -> Result<Client> {
        let transport =
            Logger::scope_future(self.config.logger.as_ref(), WsTransport::connect(&self.config))
                .await?;
        Ok(self.with_transport(transport))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport<T: Transport + 'static>(self, transport: T) -> Client {
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(SequentialIds::new()));
        Client::new(self.config, Arc::new(transport), ids)
    }
}
