use std::process::ExitCode;

use anyhow::{Context, Result};
use cardsync_core::{SyncEngine, SyncReport};
use cardsync_ingest::SourceClient;
use cardsync_ledger::LedgerClient;
use chrono::Utc;
use clap::Parser;

mod config;
mod logging;

use config::{Cli, Config};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = Cli::try_parse() {
        let _ = err.print();
        // --help and --version are not failures
        return if err.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    logging::init();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting cardsync");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(report) => {
            tracing::info!(
                fetched = report.fetched,
                imported = report.imported,
                "sync complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<SyncReport> {
    if config.insecure {
        tracing::warn!("running in insecure mode, which skips TLS verify");
    }

    let ledger = LedgerClient::new(&config.ledger_access_token, config.insecure)
        .context("failed to build ledger client")?
        .with_base_url(&config.ledger_url);
    let source = SourceClient::new(
        &config.source_url,
        &config.source_username,
        &config.source_password,
    );

    let job = config.sync_job(Utc::now());
    SyncEngine::new(source, ledger).run(&job).await
}
