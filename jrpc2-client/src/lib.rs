//! JSON-RPC 2.0 client over HTTP and WebSocket
//!
//! This crate sends JSON-RPC 2.0 calls to a remote endpoint and decodes the
//! replies into typed results, using the envelope builder and response decoder
//! from `jrpc2-core`.
//!
//! # Core Features
//!
//! - **HTTP Transport**: one `POST` per call, with user agent and bearer token
//! - **WebSocket Transport**: many concurrent calls over one connection,
//!   matched to replies by id
//! - **Typed Calls**: params from any `Serialize`, results into any
//!   `DeserializeOwned`
//! - **Error Taxonomy**: server errors, malformed replies, type mismatches and
//!   null results are told apart
//! - **Explicit Logging**: events go to the logger in the configuration, or
//!   nowhere
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrpc2_client::ClientBuilder;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new("http://localhost:8545").build()?;
//!
//!     let sum: i64 = client.call("add", json!([5, 3])).await?;
//!     println!("Result: {}", sum);
//!
//!     // A null result is an error for `call`, but not for `call_optional`
//!     let block: Option<serde_json::Value> = client.call_optional("getBlock", [42]).await?;
//!     println!("Block: {:?}", block);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod client_builder;
mod config;
mod id;
mod request;
pub mod transport;

pub use client::Client;
pub use client_builder::ClientBuilder;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use id::{IdGenerator, SequentialIds};
pub use transport::{HttpTransport, Transport, WsTransport};
