//! Custom API example demonstrating how to implement a new scan backend.
//!
//! This example shows how to:
//! - Implement the ScanApi trait for a custom backend
//! - Return the three poll outcomes a backend can report
//! - Integrate with the ListOrchestrator
//!
//! Run with: cargo run --example custom_api

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use scanledger::prelude::*;

/// A scan API that answers every poll instantly with a canned report.
///
/// This demonstrates how to implement a custom scan backend. A real
/// implementation would talk to a remote service; this one fabricates a
/// terminal result after a fixed number of polls per scan.
#[derive(Debug)]
struct InstantScanApi {
    name: String,
    issued: AtomicU64,
    polls_until_done: u64,
    polled: AtomicU64,
}

impl InstantScanApi {
    /// Creates a new API that completes scans after the given poll count.
    fn new(name: impl Into<String>, polls_until_done: u64) -> Self {
        Self {
            name: name.into(),
            issued: AtomicU64::new(0),
            polls_until_done,
            polled: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ScanApi for InstantScanApi {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(
        &self,
        list: &ListName,
        domains: &[String],
        scan_type: ScanType,
    ) -> Result<String, ScanError> {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        let scan_id = format!("instant-{n:03}");

        tracing::info!(
            list = %list,
            scan_type = %scan_type,
            domains = domains.len(),
            scan_id = %scan_id,
            "Accepted scan"
        );

        Ok(scan_id)
    }

    async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
        let polls = self.polled.fetch_add(1, Ordering::Relaxed) + 1;

        // Stay in progress for a few polls, then report a finished scan
        if polls < self.polls_until_done {
            return Ok(ScanStatus::InProgress);
        }

        Ok(ScanStatus::Completed(ScanReport::new(serde_json::json!({
            "request": {"request_id": scan_id, "status": "done"},
            "domains": {"scored": true}
        }))))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Custom API Example ===\n");

    let source = DomainFile::from_json_str(
        r#"{
            "lists": {
                "Registrars": {"mail": ["registrar-a.nl", "registrar-b.nl"]}
            }
        }"#,
    )?;

    let results_dir = tempfile::tempdir()?;

    // The custom backend reports completion on the third poll
    let api = InstantScanApi::new("instant", 3);

    let summary = ListOrchestrator::builder()
        .with_api(api)
        .with_source(source)
        .with_results_dir(results_dir.path())
        .with_scan_type(ScanType::Mail)
        .with_poll_config(PollConfig::immediate())
        .build()?
        .run()
        .await?;

    println!("\n=== Run Summary ===");
    println!("Completed:   {}", summary.completed);
    println!("Skipped:     {}", summary.skipped);
    println!("Resubmitted: {}", summary.resubmitted);

    let store = ResultStore::open(results_dir.path(), ScanType::Mail)?;
    let result = store.load_result(&ListName::new("Registrars"))?;
    println!("\nStored report: {}", serde_json::to_string_pretty(result.report.as_value())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
