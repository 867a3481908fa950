//! jrpc2 - JSON-RPC 2.0 client toolkit
//!
//! This is the convenience crate that re-exports the jrpc2 sub-crates. Use it
//! if you want a single dependency for both the protocol pieces and the client.
//!
//! # Architecture
//!
//! - **jrpc2-core**: request envelope, response decoder, error taxonomy, logging
//! - **jrpc2-client**: configuration, id generation, HTTP and WebSocket
//!   transports, the `Client` itself
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrpc2::{ClientBuilder, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new("http://localhost:8545")
//!         .auth_token("s3cret")
//!         .build()?;
//!
//!     match client.call::<_, String>("version", ()).await {
//!         Ok(version) => println!("Server version: {}", version),
//!         Err(Error::Protocol(e)) => println!("Server said no: {} ({})", e.message, e.code),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Decoding Without a Client
//!
//! ```rust
//! use jrpc2::{codec, Error};
//!
//! let err = codec::decode_response::<u32>(br#"{"jsonrpc":"2.0","result":null,"id":1}"#).unwrap_err();
//! assert!(matches!(err, Error::NullResult));
//! ```

pub use jrpc2_client as client;
pub use jrpc2_core as core;

pub use jrpc2_core::codec;
pub use jrpc2_core::{
    init_logging, Error, ErrorCode, ErrorKind, JsonRpcRequest, Logger, LoggingConfig,
    ProtocolError, ResponseDecoder, Result,
};

pub use jrpc2_client::{
    Client, ClientBuilder, ClientConfig, HttpTransport, IdGenerator, SequentialIds, Transport,
    WsTransport,
};
