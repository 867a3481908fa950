//! Core JSON-RPC 2.0 client types and codec for jrpc2
//!
//! This crate holds the protocol layer of a JSON-RPC 2.0 client, with no
//! transport attached:
//!
//! - **Types**: the request envelope and the raw response envelope
//! - **Codec**: request encoding and the response decoder
//! - **Error handling**: the error taxonomy every decode ends in
//! - **Logging**: the optional logger collaborator and subscriber setup
//!
//! # Architecture
//!
//! A call is a pipeline: build a [`JsonRpcRequest`], encode it, let a
//! transport carry the bytes, then decode whatever bytes come back. This crate
//! owns the first and last steps. `jrpc2-client` supplies the id generator, the
//! transports and the `Client` that strings everything together.
//!
//! Everything here is stateless and can be used from many threads at once.
//!
//! # Example
//!
//! ```rust
//! use jrpc2_core::{codec, ErrorKind, JsonRpcRequest};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new("greet", Some(json!({"name": "ada"})), 1);
//! let bytes = codec::encode_request(&request).unwrap();
//!
//! // ... the transport sends `bytes` and returns the server's reply ...
//! let reply = br#"{"jsonrpc":"2.0","result":"hello ada","id":1}"#;
//!
//! let greeting: String = codec::decode_response(reply).unwrap();
//! assert_eq!(greeting, "hello ada");
//!
//! let mismatch = codec::decode_response::<u32>(reply).unwrap_err();
//! assert_eq!(mismatch.kind(), ErrorKind::TypeMismatch);
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod types;

pub use codec::ResponseDecoder;
pub use error::{Error, ErrorCode, ErrorKind, ProtocolError, Result};
pub use logging::{init_logging, Logger, LoggingConfig};
pub use types::{JsonRpcRequest, ResponseEnvelope, JSONRPC_VERSION};
