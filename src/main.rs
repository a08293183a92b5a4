//! Command-line entry point for batch domain-list scanning.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scanledger::backends::{HttpApiConfig, HttpScanApi};
use scanledger::source::DomainFile;
use scanledger::{ListOrchestrator, ScanType};

/// Submit domain lists to a scanning service and collect the results.
#[derive(Parser, Debug)]
#[command(
    name = "scanledger",
    version,
    about = "Batch web and mail security scans over named domain lists",
    long_about = "Submits named lists of domains to a scanning service's batch API, polls \
                  each scan to completion, and stores results on disk. Lists with a saved \
                  result are skipped and interrupted scans are resumed, so rerunning the \
                  same command continues where the previous run stopped.\n\n\
                  Newly issued scan ids are printed to standard error, one per line."
)]
struct Cli {
    /// Scan profile to run: web or mail
    scan_type: ScanType,

    /// Path of the JSON domains file
    #[arg(long, value_name = "FILE")]
    domains: PathBuf,

    /// Directory results are stored under
    #[arg(long, value_name = "DIR", default_value = "results")]
    dir: PathBuf,

    /// Base URL of the scanning service's batch API
    #[arg(
        long,
        value_name = "URL",
        env = "SCANLEDGER_API_URL",
        default_value = "https://batch.internet.nl/api/batch/v2"
    )]
    api_url: String,

    /// Restrict the run to the named list; may be given multiple times
    #[arg(long = "list", value_name = "NAME")]
    lists: Vec<String>,

    /// Rescan lists that already have a saved result
    #[arg(long)]
    overwrite: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();

    let (username, password) = credentials()?;
    let api = HttpScanApi::new(HttpApiConfig::new(cli.api_url, username, password));

    let source = DomainFile::load(&cli.domains)
        .with_context(|| format!("cannot load domains file {}", cli.domains.display()))?;

    let summary = ListOrchestrator::builder()
        .with_api(api)
        .with_source(source)
        .with_results_dir(cli.dir)
        .with_scan_type(cli.scan_type)
        .with_lists(cli.lists)
        .with_overwrite(cli.overwrite)
        .build()?
        .run()
        .await?;

    tracing::info!(
        scan_type = %summary.scan_type,
        completed = summary.completed,
        skipped = summary.skipped,
        resumed = summary.resumed,
        resubmitted = summary.resubmitted,
        "Batch run finished"
    );

    Ok(())
}

/// Reads the scanning service account from the environment.
fn credentials() -> anyhow::Result<(String, String)> {
    let username =
        std::env::var("SCANLEDGER_API_USER").context("SCANLEDGER_API_USER is not set")?;
    let password =
        std::env::var("SCANLEDGER_API_PASS").context("SCANLEDGER_API_PASS is not set")?;
    Ok((username, password))
}
