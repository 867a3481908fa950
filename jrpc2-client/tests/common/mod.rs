//! Common test utilities for jrpc2-client integration tests
//!
//! Two tiny servers bound to an ephemeral local port:
//!
//! - `MockWsServer`: accepts WebSocket connections, records the handshake
//!   headers and answers each request with whatever frames the handler returns
//! - `MockHttpServer`: a warp server that records each request and answers
//!   with the handler's status and body

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use warp::http::{HeaderMap, Method};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

/// Header names are lowercased
pub type Headers = HashMap<String, String>;

/// Mock WebSocket server
///
/// Every text frame is parsed as JSON and handed to the handler on its own
/// task, so a slow reply does not hold up the ones after it.
pub struct MockWsServer {
    addr: SocketAddr,
    handshakes: Arc<Mutex<Vec<Headers>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockWsServer {
    /// Start a server that answers every request with its own params as result
    pub async fn echo() -> Self {
        Self::with_handler(|request| async move {
            vec![Message::Text(mock_response(request_id(&request), request["params"].clone()))]
        })
        .await
    }

    /// Start a server with a custom handler
    ///
    /// The handler gets the parsed request and returns the frames to send
    /// back. An empty vector means no reply; a `Message::Close` ends the
    /// connection after the frames before it are sent.
    pub async fn with_handler<F, Fut>(handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<Message>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handshakes = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = handshakes.clone();
        let server = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_ws(stream, handler.clone(), recorded.clone()));
            }
        });

        Self {
            addr,
            handshakes,
            server,
        }
    }

    /// WebSocket URL for connecting to this server
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Headers of every handshake seen so far
    pub fn handshakes(&self) -> Vec<Headers> {
        self.handshakes.lock().unwrap().clone()
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn serve_ws<F, Fut>(stream: TcpStream, handler: Arc<F>, handshakes: Arc<Mutex<Vec<Headers>>>)
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<Message>> + Send + 'static,
{
    let record = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_lowercase(), value.to_str().unwrap_or_default().to_string())
            })
            .collect();
        handshakes.lock().unwrap().push(headers);
        Ok(response)
    };

    let ws_stream = match accept_hdr_async(stream, record).await {
        Ok(ws_stream) => ws_stream,
        Err(_) => return,
    };
    let (mut write, mut read) = ws_stream.split();

    // Handler tasks feed a single writer
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    let writer = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            if write.send(message).await.is_err() || closing {
                break;
            }
        }
    });

    while let Some(Ok(message)) = read.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<Value>(&text) else {
            continue;
        };

        let handler = handler.clone();
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            for frame in handler(request).await {
                let _ = out_tx.send(frame);
            }
        });
    }

    drop(out_tx);
    let _ = writer.await;
}

/// A request as seen by `MockHttpServer`
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Mock HTTP server built on warp
///
/// Records every request and answers with the handler's status and body.
pub struct MockHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: tokio::task::JoinHandle<()>,
}

impl MockHttpServer {
    /// Answer every request with 200 and `body`
    pub async fn replying(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::with_handler(move |_| (200, body.clone())).await
    }

    /// Start a server whose handler picks the status and body per request
    pub async fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let recorded = requests.clone();
        let route = warp::method()
            .and(warp::path::full())
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .map(
                move |method: Method, path: FullPath, headers: HeaderMap, body: Bytes| {
                    let request = RecordedRequest {
                        method: method.to_string(),
                        path: path.as_str().to_string(),
                        headers: headers
                            .iter()
                            .map(|(name, value)| {
                                (
                                    name.as_str().to_string(),
                                    value.to_str().unwrap_or_default().to_string(),
                                )
                            })
                            .collect(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    };
                    let (status, reply) = handler(&request);
                    recorded.lock().unwrap().push(request);

                    warp::http::Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(reply)
                        .unwrap()
                },
            );

        let (addr, serve) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        let server = tokio::spawn(serve);

        Self {
            addr,
            requests,
            server,
        }
    }

    /// Start a server that accepts requests but never answers them
    pub async fn stalling() -> Self {
        let route = warp::any().then(|| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            "too late"
        });

        let (addr, serve) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        let server = tokio::spawn(serve);

        Self {
            addr,
            requests: Arc::new(Mutex::new(Vec::new())),
            server,
        }
    }

    /// URL of the server with `path` appended
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Numeric id of a parsed request
pub fn request_id(request: &Value) -> u64 {
    request["id"].as_u64().unwrap()
}

/// JSON-RPC success response
pub fn mock_response(id: u64, result: Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": id
    })
    .to_string()
}

/// JSON-RPC error response
pub fn mock_error_response(id: u64, code: i32, message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": {
            "code": code,
            "message": message
        },
        "id": id
    })
    .to_string()
}

/// JSON-RPC notification (no id)
pub fn mock_notification(method: &str, params: Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params
    })
    .to_string()
}

/// Logger writing plain-text events into a shared buffer
pub fn capturing_logger() -> (jrpc2_core::Logger, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (jrpc2_core::Logger::new(subscriber), buffer)
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
