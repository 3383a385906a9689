//! Logging setup.
//!
//! The filter comes from [`LOG_ENV`] when it is set and parses, otherwise
//! from the configured default. Only the first [`LoggingConfig::init`] in a
//! process installs anything.
//!
//! ```
//! use habitat_app::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new()
//!     .with_format(LogFormat::Json)
//!     .with_default_filter("habitat_app=info,habitat_plugin=warn")
//!     .init();
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "HABITAT_LOG";

const FALLBACK_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line output for the terminal.
    #[default]
    Compact,
    /// Multi-line output for local debugging.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    format: LogFormat,
    default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_filter: FALLBACK_FILTER.to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Compact output filtered at `info` unless [`LOG_ENV`] says otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the directives used when [`LOG_ENV`] is unset or invalid.
    #[must_use]
    pub fn with_default_filter(mut self, directives: impl Into<String>) -> Self {
        self.default_filter = directives.into();
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(&self.default_filter))
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
    }

    fn output(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer();
        match self.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
        }
    }

    /// Installs the global subscriber and returns whether this call did so.
    pub fn init(&self) -> bool {
        let installed = tracing_subscriber::registry()
            .with(self.output())
            .with(self.filter())
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(format = ?self.format, "logging initialized");
        }
        installed
    }
}
