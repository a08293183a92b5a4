//! Batch run orchestration.
//!
//! The `ListOrchestrator` drives a set of domain lists through the scanning
//! service sequentially, skipping lists with saved results, resuming scans
//! left behind by interrupted runs, and persisting every finished result.

mod orchestrator;
mod poll;
mod session;

pub use orchestrator::{ListOrchestrator, ListOrchestratorBuilder, RunSummary};
pub use poll::PollConfig;
pub use session::ScanSession;
