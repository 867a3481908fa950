//! Error types for jrpc2
//!
//! This module defines everything that can go wrong between building a request
//! and handing a typed result back to the caller. It provides:
//!
//! - **Error**: The single error type returned by every jrpc2 operation (uses thiserror)
//! - **ErrorKind**: A flat classification of `Error` for callers that branch on it
//! - **ProtocolError**: The wire-format error object a server sends back
//! - **ErrorCode**: The standard JSON-RPC 2.0 error codes
//!
//! # Decoding Outcomes
//!
//! Decoding a response ends in exactly one of four ways:
//!
//! - `Ok(value)`: the `result` field deserialized into the requested type
//! - `Error::Protocol`: the server sent a well-formed `error` object
//! - `Error::Malformed`: the bytes are not a response envelope, or `error` is garbage
//! - `Error::TypeMismatch`: `result` is present but has the wrong shape
//!
//! plus `Error::NullResult` when the server sent neither `error` nor `result`.
//! The null-result case is deliberately its own variant so "nothing came back"
//! can be told apart from a real failure.
//!
//! # Standard Error Codes
//!
//! JSON-RPC 2.0 defines:
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid request (missing required fields)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! # Examples
//!
//! ```rust
//! use jrpc2_core::{codec, Error, ErrorCode, ErrorKind};
//!
//! let raw = br#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"no such method"},"id":1}"#;
//! let err = codec::decode_response::<u64>(raw).unwrap_err();
//!
//! assert_eq!(err.kind(), ErrorKind::Protocol);
//! assert_eq!(err.as_protocol().unwrap().code, ErrorCode::MethodNotFound);
//! assert_eq!(err.to_string(), "no such method");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for jrpc2 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for jrpc2 operations
///
/// The first four variants come out of response decoding; the rest are raised
/// by the client before a request is sent or by the transport while it is in
/// flight. Nothing in jrpc2 retries or recovers from any of them: every error
/// reaches the caller exactly as it was produced.
///
/// `Error` is `Clone` so that one transport failure can be handed to every
/// call waiting on the same connection.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The response bytes are not a JSON-RPC response envelope
    ///
    /// Raised for invalid JSON, for top-level values that are not objects, and
    /// for an `error` member that is present but is not a valid error object.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The server answered with a JSON-RPC error object
    ///
    /// Displays as the server's message, unchanged.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The `result` member could not be deserialized into the requested type
    #[error("Result type mismatch: {0}")]
    TypeMismatch(String),

    /// The call succeeded but the server sent no result
    ///
    /// Both a missing `result` member and an explicit `"result": null` end up
    /// here.
    #[error("result is null")]
    NullResult,

    /// Request parameters could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The request was rejected locally and never sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network failure or an unusable endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// The HTTP endpoint answered with a non-2xx status
    #[error("HTTP error {status}: {body}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body, lossily decoded as UTF-8
        body: String,
    },

    /// WebSocket transport layer error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The WebSocket connection is closed
    ///
    /// Every call still waiting on the connection fails with this error, as
    /// does every call made afterwards.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Flat classification of [`Error`]
///
/// Transport failures of every flavour share [`ErrorKind::Transport`], since
/// callers rarely care which transport produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Malformed`]
    Malformed,
    /// See [`Error::Protocol`]
    Protocol,
    /// See [`Error::TypeMismatch`]
    TypeMismatch,
    /// See [`Error::NullResult`]
    NullResult,
    /// See [`Error::Serialization`]
    Serialization,
    /// See [`Error::InvalidRequest`]
    InvalidRequest,
    /// Any of [`Error::Transport`], [`Error::Http`], [`Error::WebSocket`] or
    /// [`Error::ConnectionClosed`]
    Transport,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Malformed(_) => ErrorKind::Malformed,
            Error::Protocol(_) => ErrorKind::Protocol,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::NullResult => ErrorKind::NullResult,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::Transport(_)
            | Error::Http { .. }
            | Error::WebSocket(_)
            | Error::ConnectionClosed => ErrorKind::Transport,
        }
    }

    /// Returns true if this is the "no error, no result" sentinel
    pub fn is_null_result(&self) -> bool {
        matches!(self, Error::NullResult)
    }

    /// Borrow the server's error object, if this is a protocol error
    pub fn as_protocol(&self) -> Option<&ProtocolError> {
        match self {
            Error::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

/// Standard JSON-RPC 2.0 error codes
///
/// Codes outside the standard set are preserved in [`ErrorCode::Other`], so a
/// code read off the wire always converts back to the same integer. The enum
/// is for classification and display only.
///
/// # Examples
///
/// ```rust
/// use jrpc2_core::ErrorCode;
///
/// assert_eq!(ErrorCode::from(-32601), ErrorCode::MethodNotFound);
/// assert_eq!(i32::from(ErrorCode::from(1001)), 1001);
/// assert!(ErrorCode::from(-32050).is_server_error());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ErrorCode {
    /// Invalid JSON was received by the server (-32700)
    ParseError,
    /// The JSON sent is not a valid Request object (-32600)
    InvalidRequest,
    /// The method does not exist or is not available (-32601)
    MethodNotFound,
    /// Invalid method parameter(s) (-32602)
    InvalidParams,
    /// Internal JSON-RPC error (-32603)
    InternalError,
    /// Generic implementation-defined server error (-32000)
    ServerError,
    /// Any other code
    Other(i32),
}

impl ErrorCode {
    /// The integer sent on the wire
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError => -32000,
            ErrorCode::Other(code) => code,
        }
    }

    /// Returns true for codes in the implementation-defined server error range
    /// (-32099 to -32000)
    pub fn is_server_error(self) -> bool {
        (-32099..=-32000).contains(&self.code())
    }

    /// Short description of a standard code, `None` for anything else
    pub fn description(self) -> Option<&'static str> {
        match self {
            ErrorCode::ParseError => Some("Parse error"),
            ErrorCode::InvalidRequest => Some("Invalid Request"),
            ErrorCode::MethodNotFound => Some("Method not found"),
            ErrorCode::InvalidParams => Some("Invalid params"),
            ErrorCode::InternalError => Some("Internal error"),
            ErrorCode::ServerError => Some("Server error"),
            ErrorCode::Other(_) => None,
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            -32000 => ErrorCode::ServerError,
            other => ErrorCode::Other(other),
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{} ({})", self.code(), description),
            None => write!(f, "{}", self.code()),
        }
    }
}

/// JSON-RPC 2.0 error object as sent by the server
///
/// This is the exact wire format of the `error` member of a response. Both
/// `code` and `message` are required; `data` is optional and kept as an
/// untyped value.
///
/// Values of this type are only produced by the response decoder and are never
/// mutated afterwards. `Display` prints the message alone, so a protocol error
/// reads the way the server phrased it.
///
/// # Examples
///
/// ```rust
/// use jrpc2_core::{ErrorCode, ProtocolError};
///
/// let json = r#"{"code":-32602,"message":"missing amount","data":{"field":"amount"}}"#;
/// let error: ProtocolError = serde_json::from_str(json).unwrap();
///
/// assert_eq!(error.code, ErrorCode::InvalidParams);
/// assert_eq!(error.to_string(), "missing amount");
/// assert_eq!(error.data.unwrap()["field"], "amount");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolError {
    /// Numeric error code indicating the error type
    pub code: ErrorCode,

    /// Short description of the error
    pub message: String,

    /// Additional information supplied by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProtocolError {}
