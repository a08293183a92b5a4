//! Mock scan API for testing.
//!
//! This module provides a configurable mock backend that can be used in
//! tests to simulate the remote scanning service without any network,
//! including scans that linger in progress or vanish from the service.

use crate::core::{ListName, ScanApi, ScanError, ScanReport, ScanStatus, ScanType};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// One submission accepted by the mock, as the service saw it.
#[derive(Debug, Clone)]
pub struct SubmittedScan {
    /// The scan id the mock assigned.
    pub scan_id: String,
    /// The list name that was submitted.
    pub list: ListName,
    /// The scan profile of the submission.
    pub scan_type: ScanType,
    /// The domains that were submitted, in order.
    pub domains: Vec<String>,
}

/// A mock scan API for testing purposes.
///
/// Submissions are assigned deterministic ids (`scan-0001`, `scan-0002`,
/// ...) and recorded. Polls follow a scripted status sequence per scan
/// id; when a script runs out its last status repeats, and ids with no
/// script complete immediately with the default report. Ids the mock has
/// never heard of answer `NotFound`, like the real service.
///
/// # Examples
///
/// ```rust
/// use scanledger::backends::MockScanApi;
/// use scanledger::core::ScanStatus;
///
/// // A service that completes every submission on the first poll
/// let api = MockScanApi::new();
///
/// // A service still working on a previously submitted scan
/// let api = MockScanApi::new().with_script(
///     "scan-0042",
///     vec![ScanStatus::InProgress, ScanStatus::InProgress],
/// );
///
/// // A service that has forgotten a scan id
/// let api = MockScanApi::new().with_script("scan-lost", vec![ScanStatus::NotFound]);
/// ```
#[derive(Debug)]
pub struct MockScanApi {
    /// Name of this backend instance.
    name: String,
    /// Report returned when an unscripted scan completes.
    default_report: ScanReport,
    /// Scripted poll answers keyed by scan id.
    scripts: RwLock<HashMap<String, VecDeque<ScanStatus>>>,
    /// Every submission accepted so far.
    submissions: RwLock<Vec<SubmittedScan>>,
    /// Every scan id polled so far, in order.
    polled: RwLock<Vec<String>>,
    /// When set, all submissions fail with a transport error.
    refuse_submissions: RwLock<Option<String>>,
    /// Counter for submit operations.
    submit_count: AtomicU64,
    /// Counter for poll operations.
    poll_count: AtomicU64,
    /// Source of deterministic scan ids.
    next_id: AtomicU64,
}

impl MockScanApi {
    /// Creates a new mock with default settings.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            default_report: ScanReport::new(serde_json::json!({"mock": true})),
            scripts: RwLock::new(HashMap::new()),
            submissions: RwLock::new(Vec::new()),
            polled: RwLock::new(Vec::new()),
            refuse_submissions: RwLock::new(None),
            submit_count: AtomicU64::new(0),
            poll_count: AtomicU64::new(0),
            next_id: AtomicU64::new(0),
        }
    }

    /// Sets the name of this backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the report returned when an unscripted scan completes.
    pub fn with_default_report(mut self, report: ScanReport) -> Self {
        self.default_report = report;
        self
    }

    /// Scripts the poll answers for a specific scan id.
    pub fn with_script(self, scan_id: impl Into<String>, statuses: Vec<ScanStatus>) -> Self {
        self.script(scan_id, statuses);
        self
    }

    /// Scripts the poll answers for a specific scan id (shared-reference
    /// version, usable after the mock has been handed out).
    pub fn script(&self, scan_id: impl Into<String>, statuses: Vec<ScanStatus>) {
        self.scripts
            .write()
            .unwrap()
            .insert(scan_id.into(), statuses.into());
    }

    /// Makes every subsequent submission fail with a transport error.
    pub fn refuse_submissions(&self, message: impl Into<String>) {
        *self.refuse_submissions.write().unwrap() = Some(message.into());
    }

    /// Returns the number of submissions attempted.
    pub fn submit_count(&self) -> u64 {
        self.submit_count.load(Ordering::Relaxed)
    }

    /// Returns the number of polls performed.
    pub fn poll_count(&self) -> u64 {
        self.poll_count.load(Ordering::Relaxed)
    }

    /// Returns every accepted submission so far.
    pub fn submissions(&self) -> Vec<SubmittedScan> {
        self.submissions.read().unwrap().clone()
    }

    /// Returns the scan ids polled so far, in order.
    pub fn polled_ids(&self) -> Vec<String> {
        self.polled.read().unwrap().clone()
    }

    fn was_submitted(&self, scan_id: &str) -> bool {
        self.submissions
            .read()
            .unwrap()
            .iter()
            .any(|s| s.scan_id == scan_id)
    }
}

impl Default for MockScanApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanApi for MockScanApi {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(
        &self,
        list: &ListName,
        domains: &[String],
        scan_type: ScanType,
    ) -> Result<String, ScanError> {
        self.submit_count.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = self.refuse_submissions.read().unwrap().clone() {
            return Err(ScanError::transport(message));
        }

        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let scan_id = format!("scan-{n:04}");

        self.submissions.write().unwrap().push(SubmittedScan {
            scan_id: scan_id.clone(),
            list: list.clone(),
            scan_type,
            domains: domains.to_vec(),
        });

        Ok(scan_id)
    }

    async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
        self.poll_count.fetch_add(1, Ordering::Relaxed);
        self.polled.write().unwrap().push(scan_id.to_string());

        if let Some(script) = self.scripts.write().unwrap().get_mut(scan_id) {
            // The last scripted status repeats on further polls
            let status = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            if let Some(status) = status {
                return Ok(status);
            }
        }

        if self.was_submitted(scan_id) {
            Ok(ScanStatus::Completed(self.default_report.clone()))
        } else {
            Ok(ScanStatus::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_completes_submissions_by_default() {
        let api = MockScanApi::new();
        let id = api
            .submit(
                &ListName::new("banks"),
                &["a.example.nl".into()],
                ScanType::Web,
            )
            .await
            .unwrap();
        assert_eq!(id, "scan-0001");

        let status = api.poll(&id).await.unwrap();
        assert!(matches!(status, ScanStatus::Completed(_)));
        assert_eq!(api.submit_count(), 1);
        assert_eq!(api.poll_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_sequence_repeats_last_status() {
        let api = MockScanApi::new().with_script(
            "scan-0042",
            vec![ScanStatus::InProgress, ScanStatus::NotFound],
        );

        assert_eq!(api.poll("scan-0042").await.unwrap(), ScanStatus::InProgress);
        assert_eq!(api.poll("scan-0042").await.unwrap(), ScanStatus::NotFound);
        assert_eq!(api.poll("scan-0042").await.unwrap(), ScanStatus::NotFound);
        assert_eq!(api.polled_ids().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_unknown_id_is_not_found() {
        let api = MockScanApi::new();
        assert_eq!(api.poll("never-issued").await.unwrap(), ScanStatus::NotFound);
    }

    #[tokio::test]
    async fn test_mock_refuses_submissions_when_told() {
        let api = MockScanApi::new();
        api.refuse_submissions("service down for maintenance");

        let err = api
            .submit(&ListName::new("banks"), &[], ScanType::Mail)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Transport { .. }));
        assert_eq!(api.submit_count(), 1);
        assert!(api.submissions().is_empty());
    }

    #[tokio::test]
    async fn test_mock_records_submission_details() {
        let api = MockScanApi::new();
        api.submit(
            &ListName::new("museums"),
            &["m.example.nl".into(), "n.example.nl".into()],
            ScanType::Mail,
        )
        .await
        .unwrap();

        let submitted = api.submissions();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].list.as_str(), "MUSEUMS");
        assert_eq!(submitted[0].scan_type, ScanType::Mail);
        assert_eq!(submitted[0].domains.len(), 2);
    }
}
