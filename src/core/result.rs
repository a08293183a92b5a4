//! Scan result structures.
//!
//! This module defines `ScanReport`, the raw result document a completed
//! scan yields, and `ListResult`, the durable record of a fully tested
//! list that the result store persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{ListName, ScanType};

/// The raw structured result returned by the scanning service.
///
/// The service's result schema evolves independently of this crate, so
/// the payload is kept as an opaque JSON document and persisted verbatim.
/// Downstream tooling (report generators, dashboards) interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanReport {
    /// The result document exactly as the service returned it.
    pub payload: serde_json::Value,
}

impl ScanReport {
    /// Wraps a raw result document.
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }

    /// Returns the raw result document.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.payload
    }
}

impl From<serde_json::Value> for ScanReport {
    fn from(payload: serde_json::Value) -> Self {
        Self::new(payload)
    }
}

/// The durable output of one completed list scan.
///
/// One `ListResult` exists per (list, scan type) and is only ever
/// replaced wholesale by a later overwrite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    /// The list this result belongs to.
    pub list_name: ListName,

    /// The scan profile that was run.
    pub scan_type: ScanType,

    /// The scan id the service assigned to this submission.
    pub scan_id: String,

    /// The domain names that were tested, in submission order.
    pub domains: Vec<String>,

    /// The raw result document.
    pub report: ScanReport,

    /// When the scan finished and the result was fetched.
    pub finished_at: DateTime<Utc>,
}

impl ListResult {
    /// Creates a result record for a scan that just finished.
    pub fn new(
        list_name: ListName,
        scan_type: ScanType,
        scan_id: impl Into<String>,
        domains: Vec<String>,
        report: ScanReport,
    ) -> Self {
        Self {
            list_name,
            scan_type,
            scan_id: scan_id.into(),
            domains,
            report,
            finished_at: Utc::now(),
        }
    }

    /// Returns how many domains were tested.
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_report_serializes_transparently() {
        let report = ScanReport::new(json!({"domains": {"example.nl": {"score": 92}}}));
        let text = serde_json::to_string(&report).unwrap();
        assert_eq!(text, r#"{"domains":{"example.nl":{"score":92}}}"#);

        let back: ScanReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_list_result_round_trip() {
        let result = ListResult::new(
            ListName::new("banks"),
            ScanType::Web,
            "req-001",
            vec!["a.example.nl".into(), "b.example.nl".into()],
            ScanReport::new(json!({"ok": true})),
        );
        assert_eq!(result.domain_count(), 2);

        let text = serde_json::to_string(&result).unwrap();
        let back: ListResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.list_name.as_str(), "BANKS");
        assert_eq!(back.scan_id, "req-001");
    }
}
