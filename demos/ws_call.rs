//! WebSocket client example
//!
//! Opens one connection and runs several calls on it at once; replies are
//! matched to callers by id whatever order they arrive in.
//!
//! Run with: cargo run --example ws_call -- ws://127.0.0.1:8080

use jrpc2::{ClientBuilder, Logger, LoggingConfig};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:8080".to_string());

    // Route client events to their own subscriber instead of a global one
    let logger = Logger::from_config(&LoggingConfig::new("jrpc2_client=debug,jrpc2_core=debug"))?;

    let client = ClientBuilder::new(url).logger(logger).connect().await?;
    println!("Connected");

    let calls: Vec<_> = (1..=5)
        .map(|n| {
            let client = client.clone();
            tokio::spawn(async move { client.call::<_, Value>("echo", json!({ "n": n })).await })
        })
        .collect();

    for call in calls {
        match call.await? {
            Ok(value) => println!("Echoed: {}", value),
            Err(e) => println!("Call failed: {}", e),
        }
    }

    // Missing results are not errors here
    let latest: Option<Value> = client.call_optional("getLatest", ()).await?;
    println!("Latest: {:?}", latest);

    Ok(())
}
