//! Client configuration
//!
//! The options a client is created with. They are fixed once the client
//! exists; every call reads them, none changes them.

use jrpc2_core::Logger;
use std::time::Duration;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("jrpc2/", env!("CARGO_PKG_VERSION"));

/// How long a call may wait for its reply when no timeout is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and logging options for a [`Client`](crate::Client)
///
/// # Examples
///
/// ```rust
/// use jrpc2_client::ClientConfig;
///
/// let config = ClientConfig::new("https://node.example.com/rpc")
///     .with_user_agent("wallet/2.1")
///     .with_auth_token("s3cret");
///
/// assert_eq!(config.base_url, "https://node.example.com/rpc");
/// assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint every request is sent to (`http(s)://` or `ws(s)://`)
    pub base_url: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Bearer token for the `Authorization` header, if any
    pub auth_token: Option<String>,
    /// Where log events go; `None` disables logging for calls
    pub logger: Option<Logger>,
    /// Upper bound on one round trip, enforced by the transport
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the default user agent, no token and no logger
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_token: None,
            logger: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the authentication token
    ///
    /// An empty token is treated as no token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Set the logger
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://localhost:8545");
        assert_eq!(config.base_url, "http://localhost:8545");
        assert!(config.user_agent.starts_with("jrpc2/"));
        assert!(config.auth_token.is_none());
        assert!(config.logger.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_config_setters() {
        let config = ClientConfig::new("http://localhost:8545")
            .with_user_agent("tester/1.0")
            .with_auth_token("token-123")
            .with_logger(Logger::current())
            .with_timeout(Duration::from_millis(250));

        assert_eq!(config.user_agent, "tester/1.0");
        assert_eq!(config.auth_token, Some("token-123".to_string()));
        assert!(config.logger.is_some());
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_empty_token_means_no_token() {
        let config = ClientConfig::new("http://localhost").with_auth_token("");
        assert!(config.auth_token.is_none());
    }
}
