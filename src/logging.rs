//! Structured logging for VitalRS
//!
//! Engines never log warnings themselves; they attach [`Diagnostic`]s to
//! their results. The binary installs a subscriber here and forwards those
//! diagnostics with [`log_diagnostics`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::VitalsError;
use crate::models::Diagnostic;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Console format (pretty, json, compact)
    pub format: LogFormat,

    /// Optional JSON log file in addition to stderr
    pub file_path: Option<PathBuf>,

    /// Roll the log file daily instead of appending to one file
    pub rotation: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: None,
            rotation: true,
        }
    }
}

/// Log level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Raise `self` by one level per `-v` flag
    pub fn raised_by(self, verbosity: u8) -> Self {
        const ORDER: [LogLevel; 5] = [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let index = (self as usize + verbosity as usize).min(ORDER.len() - 1);
        ORDER[index]
    }
}

impl FromStr for LogLevel {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(VitalsError::parse("log level", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// JSON lines
    Json,
    /// Single-line format
    Compact,
}

impl FromStr for LogFormat {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(VitalsError::parse("log format", s)),
        }
    }
}

/// Install the global subscriber
///
/// Console output goes to stderr so `--json` results on stdout stay
/// machine-readable. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vitalrs={}", config.level.as_filter())));

    let console_layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(console_layer);

    if let Some(file_path) = &config.file_path {
        let directory = file_path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(directory)?;

        if config.rotation {
            let file_name = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("vitalrs.log");
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let file_layer = fmt::layer().json().with_writer(appender).with_ansi(false);
            subscriber.with(file_layer).try_init()?;
        } else {
            let file = fs::OpenOptions::new().create(true).append(true).open(file_path)?;
            let file_layer = fmt::layer().json().with_writer(file).with_ansi(false);
            subscriber.with(file_layer).try_init()?;
        }
    } else {
        subscriber.try_init()?;
    }

    tracing::debug!(
        level = ?config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}

/// Emit each diagnostic as a warning tagged with the producing operation
pub fn log_diagnostics(operation: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        tracing::warn!(
            operation,
            kind = ?diagnostic.kind,
            "{}",
            diagnostic.message
        );
    }
}
