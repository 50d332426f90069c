mod cli;
mod client;
mod config;
mod error;
mod extract;
mod logging;
mod record;
mod render;
mod scraper;

use crate::cli::{version_banner, Cli};
use crate::error::Result;
use crate::extract::{extract_records, ExtractOptions};
use crate::logging::{init_logging, LoggerConfig, FATAL_TARGET};
use crate::render::render;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help lands here too; it is not a failure
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    if cli.version {
        eprintln!("{}", version_banner());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(target: FATAL_TARGET, &e => "Run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let format = config.output_format()?;

    init_logging(LoggerConfig::from_config(&config.logging)?)?;

    let url = config.endpoint();
    log_info!(
        "[main] Fetching {} notices from {} as {}",
        if config.graduate { "graduate" } else { "undergraduate" },
        url,
        format
    );

    let options = ExtractOptions::from_config(&config)?;
    let records = extract_records(url, &options).await?;

    let stdout = std::io::stdout();
    render(&records, format, config.pretty, &mut stdout.lock())?;

    log_info!("[main] Wrote {} records", records.len());
    Ok(())
}
