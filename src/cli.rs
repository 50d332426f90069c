use crate::config::Config;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Fetch UEC class-cancellation notices (休講情報) as JSON or a text table
#[derive(Parser, Debug)]
#[command(name = "kyuukou", long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Output format: json or text (required here or in the config file)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Read the graduate school page instead of the undergraduate one
    #[arg(long)]
    pub graduate: bool,

    /// Print version information to stderr and exit
    #[arg(long)]
    pub version: bool,

    /// Fetch this page instead of the configured endpoint
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// What to do with malformed rows: abort or skip
    #[arg(long, value_name = "POLICY")]
    pub on_row_error: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Loads the config file (if any), applies the flags on top, and validates the result.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(format) = &self.format {
            config.format = Some(format.clone());
        }
        if self.graduate {
            config.graduate = true;
        }
        if let Some(url) = &self.url {
            config.url = Some(url.clone());
        }
        if let Some(policy) = &self.on_row_error {
            config.on_row_error = policy.parse()?;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout = timeout;
        }
        if self.pretty {
            config.pretty = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(())
    }
}

pub fn version_banner() -> String {
    format!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, RowPolicy};
    use crate::error::{AppError, ConfigError};
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kyuukou").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "-f",
            "text",
            "--graduate",
            "--on-row-error",
            "skip",
            "--timeout",
            "7",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.output_format().unwrap(), OutputFormat::Text);
        assert_eq!(
            config.endpoint(),
            "http://kyoumu.office.uec.ac.jp/kyuukou/kyuukou2.html"
        );
        assert_eq!(config.on_row_error, RowPolicy::Skip);
        assert_eq!(config.fetch.timeout, 7);
    }

    #[test]
    fn flags_win_over_the_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"text\"\non_row_error = \"skip\"").unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse(&["--config", path, "--format", "json"])
            .resolve_config()
            .unwrap();
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);
        assert_eq!(config.on_row_error, RowPolicy::Skip);
    }

    #[test]
    fn unsupported_format_is_accepted_by_the_parser_and_rejected_later() {
        let config = parse(&["-f", "xml"]).resolve_config().unwrap();
        assert!(matches!(
            config.output_format(),
            Err(AppError::Config(ConfigError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn bad_policy_and_zero_timeout_are_config_errors() {
        assert!(parse(&["--on-row-error", "maybe"]).resolve_config().is_err());
        assert!(parse(&["--timeout", "0"]).resolve_config().is_err());
    }

    #[test]
    fn unknown_flags_fail_to_parse() {
        assert!(Cli::try_parse_from(["kyuukou", "--xml"]).is_err());
    }

    #[test]
    fn version_flag_is_ours() {
        assert!(parse(&["--version"]).version);
        assert_eq!(
            version_banner(),
            format!("kyuukou version {}", env!("CARGO_PKG_VERSION"))
        );
    }
}
