use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Row parse error: {0}")]
    RowParse(#[from] RowParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short machine-readable tag attached to structured log events.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Fetch(_) => "fetch",
            AppError::RowParse(_) => "row_parse",
            AppError::Serialization(_) => "serialization",
            AppError::Io(_) => "io",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Unsupported output format: {0} (expected json or text)")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("Response error {status_code} from {url}")]
    ResponseError { status_code: u16, url: String },

    #[error("No table rows found at `{selector}`")]
    MissingTable { selector: String },
}

/// A table row that does not have the six-cell period/date shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: invalid {field}: {reason}")]
pub struct RowParseError {
    /// Position of the row within the table body; the header row is 0.
    pub row: usize,
    pub field: &'static str,
    pub reason: String,
}

impl RowParseError {
    pub fn new(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            row,
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
