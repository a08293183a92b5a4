//! Audit event emission functions.

use uuid::Uuid;

use crate::core::{ListName, ScanType};
use crate::manager::RunSummary;

/// Emits an audit event for a batch run starting.
pub fn emit_run_started(run_id: Uuid, scan_type: ScanType, lists: &[ListName], overwrite: bool) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "run_started",
        run_id = %run_id,
        scan_type = %scan_type,
        lists = ?lists,
        list_count = lists.len(),
        overwrite,
        "Run started"
    );
}

/// Emits an audit event for a list skipped because its result already exists.
pub fn emit_list_skipped(run_id: Uuid, list: &ListName, scan_id: &str) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "list_skipped",
        run_id = %run_id,
        list = %list,
        scan_id = %scan_id,
        "List already completed, skipping"
    );
}

/// Emits an audit event for a newly submitted scan.
pub fn emit_scan_submitted(
    run_id: Uuid,
    list: &ListName,
    scan_type: ScanType,
    scan_id: &str,
    domain_count: usize,
) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "scan_submitted",
        run_id = %run_id,
        list = %list,
        scan_type = %scan_type,
        scan_id = %scan_id,
        domain_count,
        "Scan submitted"
    );
}

/// Emits an audit event for a scan resumed from a stored scan id.
pub fn emit_scan_resumed(run_id: Uuid, list: &ListName, scan_type: ScanType, scan_id: &str) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "scan_resumed",
        run_id = %run_id,
        list = %list,
        scan_type = %scan_type,
        scan_id = %scan_id,
        "Resuming scan from stored id"
    );
}

/// Emits an audit event for a stored scan id the service no longer knows.
pub fn emit_scan_lost(run_id: Uuid, list: &ListName, scan_id: &str) {
    tracing::warn!(
        target: "scanledger::audit",
        event_type = "scan_lost",
        run_id = %run_id,
        list = %list,
        scan_id = %scan_id,
        "Stored scan no longer known to the service, resubmitting"
    );
}

/// Emits an audit event for a list result persisted to the store.
pub fn emit_result_saved(
    run_id: Uuid,
    list: &ListName,
    scan_type: ScanType,
    scan_id: &str,
    domain_count: usize,
) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "result_saved",
        run_id = %run_id,
        list = %list,
        scan_type = %scan_type,
        scan_id = %scan_id,
        domain_count,
        "Result saved"
    );
}

/// Emits an audit event for a finished batch run.
pub fn emit_run_finished(summary: &RunSummary) {
    tracing::info!(
        target: "scanledger::audit",
        event_type = "run_finished",
        run_id = %summary.run_id,
        scan_type = %summary.scan_type,
        completed = summary.completed,
        skipped = summary.skipped,
        resumed = summary.resumed,
        resubmitted = summary.resubmitted,
        "Run finished"
    );
}
