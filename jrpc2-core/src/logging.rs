//! Logging configuration and the optional logger collaborator
//!
//! jrpc2 logs through the `tracing` crate, but it never writes to whatever
//! subscriber happens to be installed globally. Instead a [`Logger`] is handed
//! in explicitly (through the client configuration or a `ResponseDecoder`),
//! and every event jrpc2 emits is routed to it. With no logger, logging is
//! switched off for the duration of the call.
//!
//! This keeps tests hermetic: a test can run a call with no logger at all, or
//! with a logger that writes into a buffer it inspects afterwards.
//!
//! # Usage Pattern
//!
//! ```rust,no_run
//! use jrpc2_core::{Logger, LoggingConfig};
//!
//! // Route jrpc2 events to a dedicated fmt subscriber
//! let logger = Logger::from_config(&LoggingConfig::new("debug")).unwrap();
//!
//! // Or share the application's global subscriber
//! jrpc2_core::init_logging(&LoggingConfig::default()).unwrap();
//! let logger = Logger::current();
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: default filter directive for [`LoggingConfig::default`]

use std::future::Future;
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::{Dispatch, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Optional sink for jrpc2 log events
///
/// A cheap-to-clone handle to a `tracing` dispatcher. Emitting an event never
/// fails and never blocks the call it describes.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Wrap a subscriber
    pub fn new<S>(subscriber: S) -> Self
    where
        S: Subscriber + Send + Sync + 'static,
    {
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Capture the subscriber that is the default at this point
    ///
    /// Usually the global subscriber installed by [`init_logging`].
    pub fn current() -> Self {
        Self {
            dispatch: tracing::dispatcher::get_default(|dispatch| dispatch.clone()),
        }
    }

    /// Build a fmt subscriber from `config` without installing it globally
    pub fn from_config(
        config: &LoggingConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            dispatch: fmt_dispatch(config, std::io::stderr)?,
        })
    }

    /// The underlying dispatcher
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger receiving all events
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Run `f` with events going to `logger`, or nowhere when it is `None`
    pub fn scoped<T>(logger: Option<&Logger>, f: impl FnOnce() -> T) -> T {
        match logger {
            Some(logger) => logger.in_scope(f),
            None => tracing::dispatcher::with_default(&Dispatch::none(), f),
        }
    }

    /// Attach `logger` (or a disabled dispatcher) to every poll of `fut`
    pub fn scope_future<F: Future>(logger: Option<&Logger>, fut: F) -> WithDispatch<F> {
        match logger {
            Some(logger) => fut.with_subscriber(logger.dispatch.clone()),
            None => fut.with_subscriber(Dispatch::none()),
        }
    }
}

/// Settings for the fmt subscriber built by [`Logger::from_config`] and
/// [`init_logging`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "jrpc2_client=debug"
    pub level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json: bool,
}

impl Default for LoggingConfig {
    /// Level from `RUST_LOG`, falling back to "info"; plain text output
    fn default() -> Self {
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Create a configuration with an explicit filter directive
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            json: false,
        }
    }

    /// Set the filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Toggle JSON output
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Install a global fmt subscriber
///
/// For applications that want jrpc2's events (and their own) on stderr.
/// Pair with [`Logger::current`] to hand the same subscriber to a client.
///
/// # Errors
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::dispatcher::set_global_default(fmt_dispatch(config, std::io::stderr)?)?;

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}

/// Filter plus fmt layer shared by [`Logger::from_config`] and [`init_logging`]
fn fmt_dispatch<W>(
    config: &LoggingConfig,
    writer: W,
) -> Result<Dispatch, Box<dyn std::error::Error + Send + Sync>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(&config.level)?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_line_number(true);

    let dispatch = if config.json {
        Dispatch::new(tracing_subscriber::registry().with(filter).with(layer.json()))
    } else {
        Dispatch::new(tracing_subscriber::registry().with(filter).with(layer))
    };

    Ok(dispatch)
}


#[cfg(test)]
mod tests {
    use super::test_support::capturing_logger;
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert!(!config.json);
        assert!(!config.level.is_empty());
    }

    #[test]
    fn test_custom_config() {
        let config = LoggingConfig::new("warn").with_level("debug").with_json(true);
        assert_eq!(config.level, "debug");
        assert!(config.json);
    }

    #[test]
    fn test_from_config_rejects_bad_directive() {
        let config = LoggingConfig::new("jrpc2=verbose");
        assert!(Logger::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_builds_logger() {
        assert!(Logger::from_config(&LoggingConfig::new("debug")).is_ok());
        assert!(Logger::from_config(&LoggingConfig::new("info").with_json(true)).is_ok());
    }

    #[test]
    fn test_text_and_json_share_layer_settings() {
        for json in [false, true] {
            let logs = test_support::CapturedLogs::default();
            let writer = logs.clone();
            let config = LoggingConfig::new("trace").with_json(json);
            let logger = Logger {
                dispatch: fmt_dispatch(&config, move || writer.clone()).unwrap(),
            };

            let line = line!(); logger.in_scope(|| tracing::info!("shared layer"));

            let output = logs.contents();
            assert!(output.contains("shared layer"), "json={} output={}", json, output);
            assert!(output.contains("jrpc2_core::logging"), "json={} output={}", json, output);
            if json {
                assert!(output.contains(&format!("\"line_number\":{}", line)), "output={}", output);
            } else {
                assert!(output.contains(&format!("{}:", line)), "output={}", output);
            }
        }
    }

    #[test]
    fn test_in_scope_routes_events() {
        let (logger, logs) = capturing_logger();

        logger.in_scope(|| tracing::info!(method = "ping", "routed event"));

        let output = logs.contents();
        assert!(output.contains("routed event"));
        assert!(output.contains("ping"));
    }

    #[test]
    fn test_scoped_without_logger_is_silent() {
        let (logger, logs) = capturing_logger();

        logger.in_scope(|| {
            // An inner disabled scope must swallow the event
            Logger::scoped(None, || tracing::info!("dropped event"));
        });

        assert!(!logs.contents().contains("dropped event"));
    }

    #[test]
    fn test_scoped_returns_closure_value() {
        assert_eq!(Logger::scoped(None, || 40 + 2), 42);
    }
}
