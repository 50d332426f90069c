use crate::error::{ConfigError, Result};
use crate::logging::parse_log_level;
use encoding_rs::Encoding;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(ConfigError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Text => f.write_str("text"),
        }
    }
}

/// What to do with a table row that cannot be turned into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Fail the whole extraction on the first malformed row.
    #[default]
    Abort,
    /// Log the malformed row and continue with the rest.
    Skip,
}

impl FromStr for RowPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "strict" => Ok(RowPolicy::Abort),
            "skip" => Ok(RowPolicy::Skip),
            _ => Err(ConfigError::InvalidValue(format!(
                "on_row_error must be abort or skip: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_undergraduate_url")]
    pub undergraduate: String,
    #[serde(default = "default_graduate_url")]
    pub graduate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Output format; required from either the file or the command line.
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub graduate: bool,

    /// Explicit page URL, taking precedence over the endpoint selection.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub pretty: bool,

    #[serde(default)]
    pub on_row_error: RowPolicy,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

// Default implementations
impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            undergraduate: default_undergraduate_url(),
            graduate: default_graduate_url(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            encoding: default_encoding(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            filename: default_log_filename(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Defaults, or the file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("endpoints.undergraduate", &self.endpoints.undergraduate),
            ("endpoints.graduate", &self.endpoints.graduate),
        ] {
            validate_url(name, url)?;
        }

        if let Some(url) = &self.url {
            validate_url("url", url)?;
        }

        if self.fetch.timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "fetch.timeout must be greater than 0".to_string(),
            )
            .into());
        }

        self.encoding()?;
        parse_log_level(&self.logging.level)?;

        if !self.logging.directory.is_empty() && self.logging.filename.is_empty() {
            return Err(ConfigError::InvalidValue(
                "logging.filename cannot be empty when logging.directory is set".to_string(),
            )
            .into());
        }

        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        let format = self
            .format
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("format".to_string()))?;
        Ok(format.parse()?)
    }

    /// The page to fetch: the explicit URL, otherwise the selected endpoint.
    pub fn endpoint(&self) -> &str {
        match &self.url {
            Some(url) => url,
            None if self.graduate => &self.endpoints.graduate,
            None => &self.endpoints.undergraduate,
        }
    }

    pub fn encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.fetch.encoding.trim().as_bytes()).ok_or_else(|| {
            ConfigError::InvalidValue(format!("unknown encoding: {}", self.fetch.encoding)).into()
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout)
    }
}

fn validate_url(name: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ConfigError::MissingField(name.to_string()).into());
    }
    if !url.starts_with("http") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must start with http(s): {}",
            name, url
        ))
        .into());
    }
    Ok(())
}

fn default_undergraduate_url() -> String {
    "http://kyoumu.office.uec.ac.jp/kyuukou/kyuukou.html".to_string()
}

fn default_graduate_url() -> String {
    "http://kyoumu.office.uec.ac.jp/kyuukou/kyuukou2.html".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_encoding() -> String {
    "Shift_JIS".to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_filename() -> String {
    "kyuukou.log".to_string()
}
