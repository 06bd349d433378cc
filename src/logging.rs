//! Logging setup for the board and the CLI.
//!
//! Logs go to stderr so headless output on stdout stays clean. While the
//! interactive display owns the terminal, logging is off unless `RUST_LOG`
//! asks for it.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level - every flip
    Trace,
    /// Debug level - mounts, teardowns, actions
    Debug,
    /// Info level
    Info,
    /// Warning level (default)
    #[default]
    Warn,
    /// Error level - least verbose
    Error,
    /// Disable logging entirely
    Off,
}

impl LogLevel {
    /// Level chosen by `-q` and repeated `-v` flags.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Off;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

/// Configuration for the log subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use
    pub level: LogLevel,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include the target (module path)
    pub with_target: bool,
    /// Whether to emit ANSI colors
    pub with_ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            with_timestamps: true,
            with_target: true,
            with_ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set whether to include timestamps.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    /// Set whether to include the target (module path).
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Set whether to emit ANSI colors.
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.with_ansi = enabled;
        self
    }

    /// Configuration from the CLI flags.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        Self::default().with_level(LogLevel::from_flags(quiet, verbose))
    }

    /// Quiet everything: stderr writes would tear the alternate screen.
    pub fn for_interactive(self) -> Self {
        self.with_level(LogLevel::Off)
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice is
/// harmless; the second call is ignored.
///
/// # Examples
///
/// ```no_run
/// use flapboard::logging::{init_logging, LoggingConfig, LogLevel};
///
/// init_logging(LoggingConfig::new().with_level(LogLevel::Debug));
/// ```
pub fn init_logging(config: LoggingConfig) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.directive())
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_ansi(config.with_ansi);

    let installed = if config.with_timestamps {
        subscriber.try_init()
    } else {
        subscriber.without_time().try_init()
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
