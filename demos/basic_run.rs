//! Basic batch run example driving mock scans over two domain lists.
//!
//! This example shows how to:
//! - Load a domain source from JSON
//! - Build a ListOrchestrator
//! - Run a batch and inspect the summary
//! - Rerun against the same results directory and watch lists being skipped
//!
//! Run with: cargo run --example basic_run

use scanledger::backends::MockScanApi;
use scanledger::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Scanledger Basic Run Example ===\n");

    // Two named lists of domains, each with a web scan profile
    let source = DomainFile::from_json_str(
        r#"{
            "lists": {
                "Municipalities": {"web": ["gemeente-a.nl", "gemeente-b.nl"]},
                "Banks": {"web": ["bank-one.nl", "bank-two.nl", "bank-three.nl"]}
            }
        }"#,
    )?;

    // Results land under this directory, namespaced by scan type
    let results_dir = tempfile::tempdir()?;

    // First run: both lists are submitted and polled to completion
    let summary = ListOrchestrator::builder()
        .with_api(MockScanApi::new())
        .with_source(source.clone())
        .with_results_dir(results_dir.path())
        .with_scan_type(ScanType::Web)
        .with_poll_config(PollConfig::immediate())
        .build()?
        .run()
        .await?;

    println!("First run:  {} completed, {} skipped", summary.completed, summary.skipped);

    // Second run against the same directory: every list already has a
    // saved result, so nothing is submitted
    let summary = ListOrchestrator::builder()
        .with_api(MockScanApi::new())
        .with_source(source)
        .with_results_dir(results_dir.path())
        .with_scan_type(ScanType::Web)
        .with_poll_config(PollConfig::immediate())
        .build()?
        .run()
        .await?;

    println!("Second run: {} completed, {} skipped", summary.completed, summary.skipped);

    // Saved results are plain JSON files, readable through the store
    let store = ResultStore::open(results_dir.path(), ScanType::Web)?;
    let result = store.load_result(&ListName::new("Banks"))?;

    println!("\n=== Stored Result ===");
    println!("List:    {}", result.list_name);
    println!("Scan id: {}", result.scan_id);
    println!("Domains: {}", result.domain_count());

    println!("\n=== Example Complete ===");
    Ok(())
}
