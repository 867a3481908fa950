//! JSON-RPC 2.0 envelopes as seen from the client side
//!
//! A client only ever writes requests and reads responses, so this module
//! holds exactly those two shapes:
//!
//! 1. **JsonRpcRequest**: the outgoing call, serialized as
//!    `{"jsonrpc":"2.0","method":...,"params":...,"id":...}`
//! 2. **ResponseEnvelope**: the incoming reply, with `result` and `error` kept
//!    as raw JSON until the caller says what type it wants
//!
//! # Request IDs
//!
//! Ids are unsigned integers handed out by the client's id generator. The
//! envelope does not generate or check them; uniqueness is the generator's job.
//!
//! # Why Raw Values?
//!
//! `result` and `error` are captured as `serde_json::value::RawValue` so the
//! envelope parses in one pass without knowing the result type. The second
//! step, deserializing into the caller's type, can then fail on its own and be
//! reported as a type mismatch rather than a malformed response.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Protocol version string carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request message
///
/// Field order matches the wire order: `jsonrpc`, `method`, `params`, `id`.
/// `params` is left out of the encoded message when it is `None`.
///
/// # Examples
///
/// ```rust
/// use jrpc2_core::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new("foo", Some(json!({"x": 1})), 42);
/// assert_eq!(
///     serde_json::to_string(&request).unwrap(),
///     r#"{"jsonrpc":"2.0","method":"foo","params":{"x":1},"id":42}"#
/// );
///
/// let bare = JsonRpcRequest::new("ping", None, 1);
/// assert_eq!(
///     serde_json::to_string(&bare).unwrap(),
///     r#"{"jsonrpc":"2.0","method":"ping","id":1}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version, always "2.0"
    pub jsonrpc: String,
    /// Name of the remote method to invoke
    pub method: String,
    /// Parameters passed to the method, in whatever shape the method expects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Identifier the response will carry back
    pub id: u64,
}

impl JsonRpcRequest {
    /// Build a request envelope
    ///
    /// The version is always set to "2.0". Neither the method name nor the
    /// shape of `params` is checked; that is left to the server. This never
    /// fails.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 response as received from the wire
///
/// The decoder does not trust the server to send exactly one of `result` and
/// `error`: both may be present, or neither. A missing member and an explicit
/// `null` read the same, as `None`.
///
/// `jsonrpc` defaults to an empty string and `id` to `None` when the server
/// leaves them out; unknown members are ignored.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    /// Protocol version reported by the server
    #[serde(default)]
    pub jsonrpc: String,
    /// Unparsed `result` member
    #[serde(default)]
    pub result: Option<Box<RawValue>>,
    /// Unparsed `error` member
    #[serde(default)]
    pub error: Option<Box<RawValue>>,
    /// Id echoed by the server
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    /// Returns true if the server sent a non-null `error` member
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true if the server sent a non-null `result` member
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// The echoed id, if it is an unsigned integer
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_ref().and_then(serde_json::Value::as_u64)
    }
}
