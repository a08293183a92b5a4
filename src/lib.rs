//! # Scanledger
//!
//! Bulk domain-list scanning against a remote web and mail security
//! scanning service, with durable, resumable batch runs.
//!
//! ## Overview
//!
//! Scanledger submits named lists of domains to a scanning service's batch
//! API, polls each scan to completion, and persists results on disk,
//! allowing you to:
//!
//! - Scan many domain lists in one sequential batch run
//! - Pick a web or mail scan profile per run
//! - Skip lists that already have a saved result
//! - Resume scans left in flight by an interrupted or crashed run
//! - Recover when the service has forgotten a stored scan id
//! - Capture every issued scan id on a machine-readable channel
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scanledger::{ListOrchestrator, ScanType};
//! use scanledger::backends::{HttpApiConfig, HttpScanApi};
//! use scanledger::source::DomainFile;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpScanApi::new(HttpApiConfig::new(
//!         "https://batch.example.nl/api/batch/v2",
//!         "username",
//!         "password",
//!     ));
//!
//!     let summary = ListOrchestrator::builder()
//!         .with_api(api)
//!         .with_source(DomainFile::load("domains.json")?)
//!         .with_results_dir("results")
//!         .with_scan_type(ScanType::Web)
//!         .build()?
//!         .run()
//!         .await?;
//!
//!     println!("{} lists completed, {} skipped", summary.completed, summary.skipped);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: Fundamental types, traits, and error handling
//! - **Backends**: Scan API implementations (HTTP service client, mock)
//! - **Source**: Domain list providers
//! - **Store**: Durable on-disk persistence of submissions and results
//! - **Manager**: Orchestration of batch runs across lists
//! - **Audit**: Structured progress events for run tracking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod backends;
pub mod core;
pub mod manager;
pub mod source;
pub mod store;

// Re-export commonly used types at the crate root
pub use crate::core::{
    DomainSource, ListName, ListResult, RunError, RunResult, ScanApi, ScanError, ScanReport,
    ScanStatus, ScanType, SourceError, StoreError,
};

pub use crate::manager::{ListOrchestrator, PollConfig, RunSummary, ScanSession};
pub use crate::source::DomainFile;
pub use crate::store::{ListRecord, ResultStore};

/// Prelude module for convenient imports.
///
/// ```rust
/// use scanledger::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        DomainSource, ListName, ListResult, RunError, RunResult, ScanApi, ScanError, ScanReport,
        ScanStatus, ScanType,
    };
    pub use crate::manager::{ListOrchestrator, PollConfig, RunSummary, ScanSession};
    pub use crate::source::DomainFile;
    pub use crate::store::{ListRecord, ResultStore};
}
