use crate::client::Client;
use crate::config::{Config, RowPolicy};
use crate::error::Result;
use crate::record::{Record, ZONE_NAME};
use crate::scraper::Scraper;
pub use crate::log_info;
use encoding_rs::Encoding;
use std::time::Duration;

/// Everything the fetcher needs besides the URL.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub timeout: Duration,
    pub encoding: &'static Encoding,
    pub user_agent: String,
    pub policy: RowPolicy,
    /// Fixed year for the records; `None` uses the current year in JST.
    pub year: Option<i32>,
}

impl ExtractOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            timeout: config.timeout(),
            encoding: config.encoding()?,
            user_agent: config.fetch.user_agent.clone(),
            policy: config.on_row_error,
            year: None,
        })
    }
}

/// Fetches the notice page at `url` and returns its rows as records, in table order.
pub async fn extract_records(url: &str, options: &ExtractOptions) -> Result<Vec<Record>> {
    let client = Client::builder()
        .timeout(options.timeout)
        .header("user-agent", &options.user_agent)?
        .header("accept", "text/html")?
        .build()?;

    let response = client.get(url).await?;
    log_info!(
        "[extract] Decoding {} bytes (status {}) as {}",
        response.body.len(),
        response.status,
        options.encoding.name()
    );

    let scraper = Scraper::decode(&response.body, options.encoding);
    let mut table = scraper.table();
    if let Some(year) = options.year {
        table = table.with_year(year);
    }

    let records = table.records(options.policy)?;
    log_info!(
        "[extract] {} records from {} (dates in {})",
        records.len(),
        url,
        ZONE_NAME
    );
    Ok(records)
}
