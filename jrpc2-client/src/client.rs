//! JSON-RPC client
//!
//! `Client` ties the pieces together: it takes an id, builds the request
//! envelope, hands the bytes to its transport and decodes whatever comes back.
//!
//! # Call Lifecycle
//!
//! 1. **Validate**: an empty method name is rejected before anything is sent
//! 2. **Encode**: params are serialized; `null` params are left out entirely
//! 3. **Round trip**: the transport delivers the request and returns raw bytes
//! 4. **Decode**: server errors win over results; a missing or `null` result
//!    is reported as `Error::NullResult`
//!
//! # Cloning
//!
//! `Client` is cheap to clone. Clones share the transport, the id generator
//! and the configuration, so ids stay unique across all of them.

use jrpc2_core::{codec, Error, JsonRpcRequest, Logger, ResponseDecoder, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::id::IdGenerator;
use crate::transport::Transport;

/// JSON-RPC 2.0 client over any [`Transport`]
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    ids: Arc<dyn IdGenerator>,
    decoder: ResponseDecoder,
}

impl Client {
    pub(crate) fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let decoder = ResponseDecoder::from_logger(config.logger.clone());
        Self {
            config: Arc::new(config),
            transport,
            ids,
            decoder,
        }
    }

    /// The configuration this client was created with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Call `method` and decode its result as `R`
    ///
    /// Pass `()` or `None::<T>` for a call without params.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRequest` for an empty method name
    /// - `Error::Serialization` if `params` cannot be serialized
    /// - transport errors, passed through unchanged
    /// - `Error::Malformed`, `Error::Protocol`, `Error::TypeMismatch` or
    ///   `Error::NullResult` from decoding the reply
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        Logger::scope_future(self.config.logger.as_ref(), self.call_inner(method, params)).await
    }

    /// Like [`call`](Self::call), but a `null` or missing result is `Ok(None)`
    pub async fn call_optional<P, R>(&self, method: &str, params: P) -> Result<Option<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        match self.call(method, params).await {
            Ok(value) => Ok(Some(value)),
            Err(Error::NullResult) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn call_inner<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if method.is_empty() {
            tracing::warn!("Rejecting call with an empty method name");
            return Err(Error::InvalidRequest("method name must not be empty".to_string()));
        }

        let params = match serde_json::to_value(params) {
            Ok(serde_json::Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => return Err(Error::Serialization(e.to_string())),
        };

        let id = self.ids.next_id();
        let payload = codec::encode_request(&JsonRpcRequest::new(method, params, id))?;
        tracing::debug!(method, id, bytes = payload.len(), "Sending request");

        let reply = self.transport.round_trip(id, payload).await.map_err(|e| {
            tracing::warn!(method, id, error = %e, "Request failed");
            e
        })?;

        self.decoder.decode(&reply)
    }
}
