//! HTTP client example
//!
//! Calls a JSON-RPC endpoint over HTTP and shows how each kind of failure
//! surfaces. Point it at any server with an `add` method.
//!
//! Run with: cargo run --example http_call -- http://127.0.0.1:8545

use jrpc2::{init_logging, ClientBuilder, Error, Logger, LoggingConfig};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct AddParams {
    a: i32,
    b: i32,
}

#[derive(Deserialize)]
struct AddResult {
    sum: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(&LoggingConfig::new("debug"))?;

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8545".to_string());
    let token = std::env::var("JRPC2_TOKEN").unwrap_or_default();

    let client = ClientBuilder::new(url)
        .user_agent("jrpc2-demo/0.1")
        .auth_token(token)
        .logger(Logger::current())
        .build()?;

    for i in 1..=3 {
        match client.call::<_, AddResult>("add", AddParams { a: i * 10, b: i * 5 }).await {
            Ok(result) => println!("{} + {} = {}", i * 10, i * 5, result.sum),
            Err(Error::Protocol(e)) => println!("Server error {}: {}", e.code, e.message),
            Err(Error::NullResult) => println!("Server returned no result"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
