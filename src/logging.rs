use crate::config::LogConfig;
use crate::error::{AppError, ConfigError, Result};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    Layer, Registry,
};

/// Target for the final error event. The binary already prints that error to
/// stderr itself, so only the file layer records it.
pub const FATAL_TARGET: &str = "kyuukou::fatal";

#[derive(Debug)]
pub struct LoggerConfig {
    /// Directory for the rolling log file; `None` logs to stderr only.
    pub directory: Option<String>,
    pub file_name: String,
    pub rotation: Rotation,
    pub level: Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "kyuukou.log".to_string(),
            rotation: Rotation::DAILY,
            level: Level::WARN,
        }
    }
}

impl LoggerConfig {
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        Ok(Self {
            directory: (!config.directory.is_empty()).then(|| config.directory.clone()),
            file_name: config.filename.clone(),
            rotation: Rotation::DAILY,
            level: parse_log_level(&config.level)?,
        })
    }
}

pub fn init_logging(config: LoggerConfig) -> Result<()> {
    let level = LevelFilter::from_level(config.level);

    // stdout carries the rendered output, so console logs go to stderr
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_filter(filter_fn(move |meta| {
            meta.target() != FATAL_TARGET && *meta.level() <= level
        }));

    let file_layer = match config.directory {
        Some(directory) => {
            std::fs::create_dir_all(&directory).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create log directory {}: {}", directory, e),
                ))
            })?;

            let file_appender = RollingFileAppender::new(config.rotation, directory, config.file_name);

            Some(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_filter(level),
            )
        }
        None => None,
    };

    let subscriber = Registry::default().with(stderr_layer).with(file_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "Failed to set global subscriber: {}",
            e
        )))
    })?;

    Ok(())
}

// Helper function to parse log level from string
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(AppError::Config(ConfigError::InvalidValue(format!(
            "Invalid log level: {}",
            level
        )))),
    }
}

// Helper macros for consistent logging with error handling
#[macro_export]
macro_rules! log_error {
    // Attach an AppError and its kind as fields, under an explicit target
    (target: $target:expr, $err:expr => $($arg:tt)*) => {{
        let err: &$crate::error::AppError = $err;
        tracing::error!(target: $target, error = %err, kind = err.kind(), $($arg)*)
    }};
    // Same, default target
    ($err:expr => $($arg:tt)*) => {{
        let err: &$crate::error::AppError = $err;
        tracing::error!(error = %err, kind = err.kind(), $($arg)*)
    }};
    // Handle regular string messages
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*);
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}
