//! Encoding requests and decoding responses
//!
//! The two halves of a call that sit on either side of the transport:
//!
//! - [`encode_request`] turns a [`JsonRpcRequest`] into the bytes handed to the
//!   transport
//! - [`decode_response`] (and [`ResponseDecoder`], its logging counterpart)
//!   reduces the bytes the transport brings back to a typed result or an error
//!
//! # Decoding Order
//!
//! 1. Parse the envelope. Anything that is not a JSON object is `Malformed`.
//! 2. A non-null `error` wins, even if `result` is also present. It must parse
//!    as a `ProtocolError`, otherwise the response is `Malformed`.
//! 3. A non-null `result` is deserialized into the requested type; failure is a
//!    `TypeMismatch`.
//! 4. Neither present: `NullResult`.
//!
//! Checking `error` first means a server that reports a failure is never read
//! as a success. Nothing here blocks or does I/O, and all functions can be
//! called from any number of threads at once.
//!
//! # Examples
//!
//! ```rust
//! use jrpc2_core::{codec, Error, JsonRpcRequest};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new("add", Some(json!([2, 3])), 1);
//! let bytes = codec::encode_request(&request).unwrap();
//! assert_eq!(bytes, br#"{"jsonrpc":"2.0","method":"add","params":[2,3],"id":1}"#);
//!
//! let sum: i64 = codec::decode_response(br#"{"jsonrpc":"2.0","result":5,"id":1}"#).unwrap();
//! assert_eq!(sum, 5);
//!
//! let empty = codec::decode_response::<i64>(br#"{"jsonrpc":"2.0","id":1}"#);
//! assert!(matches!(empty, Err(Error::NullResult)));
//! ```

use crate::error::{Error, ProtocolError, Result};
use crate::logging::Logger;
use crate::types::{JsonRpcRequest, ResponseEnvelope, JSONRPC_VERSION};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode any serializable value to JSON bytes
///
/// # Errors
///
/// Returns `Error::Serialization` if the value cannot be represented as JSON
/// (for example a map with non-string keys).
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a request envelope to JSON bytes
pub fn encode_request(req: &JsonRpcRequest) -> Result<Vec<u8>> {
    encode(req)
}

/// Parse the outer response envelope
///
/// Only JSON objects are accepted at the top level.
pub fn decode_envelope(raw: &[u8]) -> Result<ResponseEnvelope> {
    // serde would also accept a JSON array for a struct
    match raw.iter().copied().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => {}
        Some(_) => return Err(Error::Malformed("response is not a JSON object".to_string())),
        None => return Err(Error::Malformed("empty response".to_string())),
    }

    serde_json::from_slice(raw).map_err(|e| Error::Malformed(e.to_string()))
}

/// Reduce a parsed envelope to a typed result or an error
///
/// This is steps 2 to 4 of the decoding order described in the module docs.
pub fn into_result<R: DeserializeOwned>(envelope: ResponseEnvelope) -> Result<R> {
    if let Some(raw_error) = envelope.error {
        let error: ProtocolError = serde_json::from_str(raw_error.get())
            .map_err(|e| Error::Malformed(format!("invalid error object: {}", e)))?;
        return Err(Error::Protocol(error));
    }

    match envelope.result {
        Some(raw_result) => serde_json::from_str(raw_result.get())
            .map_err(|e| Error::TypeMismatch(e.to_string())),
        None => Err(Error::NullResult),
    }
}

/// Decode raw response bytes into `R`
///
/// See the module documentation for the exact decoding order. This function
/// emits no log events; use [`ResponseDecoder`] for that.
pub fn decode_response<R: DeserializeOwned>(raw: &[u8]) -> Result<R> {
    into_result(decode_envelope(raw)?)
}

/// Response decoder bound to an optional logger
///
/// Runs the same algorithm as [`decode_response`], reporting the branch it
/// took to the logger. Logging never changes the outcome.
///
/// # Examples
///
/// ```rust
/// use jrpc2_core::ResponseDecoder;
///
/// let decoder = ResponseDecoder::new();
/// let name: String = decoder.decode(br#"{"jsonrpc":"2.0","result":"jrpc2","id":4}"#).unwrap();
/// assert_eq!(name, "jrpc2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder {
    logger: Option<Logger>,
}

impl ResponseDecoder {
    /// Create a decoder that does not log
    pub fn new() -> Self {
        Self { logger: None }
    }

    /// Create a decoder that reports to `logger`
    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// Create a decoder from an optional logger
    pub fn from_logger(logger: Option<Logger>) -> Self {
        Self { logger }
    }

    /// The logger events are sent to, if any
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Decode raw response bytes into `R`
    pub fn decode<R: DeserializeOwned>(&self, raw: &[u8]) -> Result<R> {
        Logger::scoped(self.logger.as_ref(), || decode_logged(raw))
    }
}

fn decode_logged<R: DeserializeOwned>(raw: &[u8]) -> Result<R> {
    tracing::trace!(payload = %String::from_utf8_lossy(raw), "Decoding response");

    let envelope = decode_envelope(raw).map_err(|e| {
        tracing::warn!(error = %e, bytes = raw.len(), "Response is not a JSON-RPC envelope");
        e
    })?;

    if !envelope.jsonrpc.is_empty() && envelope.jsonrpc != JSONRPC_VERSION {
        tracing::debug!(version = %envelope.jsonrpc, "Unexpected protocol version in response");
    }

    let id = envelope.id.clone();
    let result = into_result(envelope);

    match &result {
        Ok(_) => tracing::debug!(id = ?id, "Response decoded"),
        Err(Error::Protocol(error)) => tracing::debug!(
            id = ?id,
            code = error.code.code(),
            message = %error.message,
            "Server returned an error"
        ),
        Err(Error::NullResult) => tracing::debug!(id = ?id, "Response carried no result"),
        Err(e) => tracing::warn!(id = ?id, error = %e, "Failed to decode response"),
    }

    result
}
