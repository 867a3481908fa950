//! HTTP transport
//!
//! Each call is a single `POST` of the request envelope to the configured base
//! URL. A 2xx reply's body is returned as-is; any other status becomes
//! `Error::Http` without looking at the body's contents. A call that has not
//! finished within the configured timeout fails with `Error::Transport`.

use async_trait::async_trait;
use jrpc2_core::{Error, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::transport::Transport;

/// JSON-RPC over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    auth_token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `config.base_url`
    ///
    /// # Errors
    ///
    /// `Error::Transport` if the URL does not parse, is not `http`/`https`, or
    /// the user agent is not a valid header value.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(config, client)
    }

    /// Create a transport around an existing `reqwest::Client`
    ///
    /// The client's own user agent setting wins over `config.user_agent`;
    /// `config.timeout` is applied to every request regardless.
    pub fn with_client(config: &ClientConfig, client: Client) -> Result<Self> {
        let endpoint = parse_endpoint(&config.base_url)?;

        Ok(Self {
            client,
            endpoint,
            auth_token: config.auth_token.clone(),
            timeout: config.timeout,
        })
    }

    /// The URL requests are posted to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(format!("request timed out after {:?}", self.timeout))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

fn parse_endpoint(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::Transport(format!("Invalid base URL {}: {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Transport(format!(
            "Invalid scheme for HTTP transport: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, id: u64, payload: Vec<u8>) -> Result<Vec<u8>> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .body(payload);

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(id, endpoint = %self.endpoint, error = %e, "HTTP request failed");
            self.transport_error(e)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                tracing::warn!(id, error = %e, "Failed to read response body");
                self.transport_error(e)
            })?;

        if !status.is_success() {
            tracing::warn!(id, status = status.as_u16(), "HTTP endpoint returned an error status");
            return Err(Error::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        tracing::trace!(id, status = status.as_u16(), bytes = body.len(), "HTTP response received");
        Ok(body.to_vec())
    }
}
