//! Single-scan lifecycle.

use std::time::Instant;

use crate::core::{ArcScanApi, ListName, ScanError, ScanReport, ScanStatus, ScanType};

use super::poll::PollConfig;

/// One scan's lifecycle against the remote service.
///
/// A session is created either by submitting a new scan ([`ScanSession::submit`])
/// or by attaching to a previously issued scan id ([`ScanSession::resume`]).
/// Either way, [`ScanSession::wait_for_report`] then polls the service until
/// the scan reaches a terminal state.
///
/// Resuming performs no remote call up front. Whether the stored id is still
/// live only becomes apparent on the first poll.
#[derive(Debug)]
pub struct ScanSession {
    api: ArcScanApi,
    scan_id: String,
    poll: PollConfig,
}

impl ScanSession {
    /// Submits a new scan for the given list and returns the live session.
    pub async fn submit(
        api: ArcScanApi,
        list: &ListName,
        domains: &[String],
        scan_type: ScanType,
        poll: PollConfig,
    ) -> Result<Self, ScanError> {
        let scan_id = api.submit(list, domains, scan_type).await?;

        tracing::info!(
            list = %list,
            scan_type = %scan_type,
            scan_id = %scan_id,
            domains = domains.len(),
            "Scan submitted"
        );

        Ok(Self { api, scan_id, poll })
    }

    /// Attaches to a scan that was submitted in an earlier run.
    pub fn resume(api: ArcScanApi, scan_id: impl Into<String>, poll: PollConfig) -> Self {
        Self {
            api,
            scan_id: scan_id.into(),
            poll,
        }
    }

    /// Returns the scan id this session is tracking.
    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// Polls the service until the scan finishes and returns its report.
    ///
    /// Returns [`ScanError::ScanIdNotFound`] if the service no longer knows
    /// the scan, and [`ScanError::Timeout`] if a configured `max_wait`
    /// elapses while the scan is still in progress. Transport and protocol
    /// errors from the underlying API pass through unchanged.
    pub async fn wait_for_report(&self) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            match self.api.poll(&self.scan_id).await? {
                ScanStatus::Completed(report) => {
                    tracing::info!(
                        scan_id = %self.scan_id,
                        elapsed = ?started.elapsed(),
                        "Scan finished"
                    );
                    return Ok(report);
                }
                ScanStatus::NotFound => {
                    return Err(ScanError::scan_id_not_found(&self.scan_id));
                }
                ScanStatus::InProgress => {
                    if let Some(max_wait) = self.poll.max_wait {
                        let waited = started.elapsed();
                        if waited >= max_wait {
                            return Err(ScanError::Timeout {
                                scan_id: self.scan_id.clone(),
                                waited,
                            });
                        }
                    }

                    let delay = self.poll.delay_for_attempt(attempt);
                    attempt = attempt.saturating_add(1);

                    tracing::debug!(
                        scan_id = %self.scan_id,
                        attempt,
                        delay = ?delay,
                        "Scan still in progress"
                    );

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MockScanApi;
    use crate::core::ScanApi;
    use std::sync::Arc;
    use std::time::Duration;

    fn list(name: &str) -> ListName {
        ListName::new(name)
    }

    #[tokio::test]
    async fn test_submit_captures_assigned_scan_id() {
        let api = Arc::new(MockScanApi::new());

        let session = ScanSession::submit(
            api,
            &list("Municipalities"),
            &["example.nl".to_string()],
            ScanType::Web,
            PollConfig::immediate(),
        )
        .await
        .unwrap();

        assert_eq!(session.scan_id(), "scan-0001");
    }

    #[tokio::test]
    async fn test_wait_polls_until_completed() {
        let api = Arc::new(MockScanApi::new());
        let scan_id = api
            .submit(&list("Banks"), &["bank.nl".to_string()], ScanType::Web)
            .await
            .unwrap();
        api.script(
            &scan_id,
            vec![
                ScanStatus::InProgress,
                ScanStatus::InProgress,
                ScanStatus::Completed(ScanReport::new(serde_json::json!({"done": true}))),
            ],
        );

        let session = ScanSession::resume(api.clone(), &scan_id, PollConfig::immediate());
        let report = session.wait_for_report().await.unwrap();

        assert_eq!(report.as_value()["done"], true);
        assert_eq!(api.poll_count(), 3);
    }

    #[tokio::test]
    async fn test_wait_surfaces_lost_scan() {
        let api = Arc::new(MockScanApi::new());

        let session = ScanSession::resume(api, "scan-gone", PollConfig::immediate());
        let err = session.wait_for_report().await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_wait_times_out_when_max_wait_elapses() {
        let api = Arc::new(MockScanApi::new());
        api.script("scan-slow", vec![ScanStatus::InProgress]);

        let poll = PollConfig::immediate().with_max_wait(Duration::ZERO);
        let session = ScanSession::resume(api, "scan-slow", poll);
        let err = session.wait_for_report().await.unwrap_err();

        assert!(matches!(err, ScanError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_resume_does_not_submit() {
        let api = Arc::new(MockScanApi::new());
        api.script(
            "scan-resumed",
            vec![ScanStatus::Completed(ScanReport::new(
                serde_json::json!({}),
            ))],
        );

        let session = ScanSession::resume(api.clone(), "scan-resumed", PollConfig::immediate());
        session.wait_for_report().await.unwrap();

        assert_eq!(api.submit_count(), 0);
        assert_eq!(api.polled_ids(), vec!["scan-resumed".to_string()]);
    }
}
