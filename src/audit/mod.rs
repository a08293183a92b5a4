//! Structured audit logging for batch scan runs.
//!
//! This module provides functions for emitting structured progress events
//! using the `tracing` crate under the dedicated `scanledger::audit` target.
//! Events can be captured by any tracing subscriber (JSON file,
//! OpenTelemetry, etc.) independently of regular diagnostic logging.

mod events;

pub use events::{
    emit_list_skipped, emit_result_saved, emit_run_finished, emit_run_started, emit_scan_lost,
    emit_scan_resumed, emit_scan_submitted,
};
