//! Core traits for the scanledger library.
//!
//! This module defines the `ScanApi` contract that remote scanning
//! services are driven through, and the `DomainSource` contract that
//! supplies named domain lists to a run.

use crate::core::error::{ScanError, SourceError};
use crate::core::result::ScanReport;
use crate::core::types::{ListName, ScanType};

use async_trait::async_trait;
use std::fmt::Debug;

/// The state of a submitted scan at one poll.
///
/// `NotFound` is a legitimate answer, not only a startup error: the
/// service may purge scan state it has terminally failed or forgotten,
/// in which case the only way to finish the list is a fresh submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanStatus {
    /// The scan is still running; poll again later.
    InProgress,

    /// The scan finished and produced a result document.
    Completed(ScanReport),

    /// The service does not (or no longer does) know this scan id.
    NotFound,
}

impl ScanStatus {
    /// Returns `true` if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// The remote scanning service contract.
///
/// All service backends implement this trait, providing a consistent
/// submit-then-poll interface for batch domain scans.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync` for use in async contexts.
/// - `submit` returns the service-assigned scan id as an opaque string;
///   callers persist it verbatim and pass it back to `poll` unchanged.
/// - `poll` must map "scan id unknown" responses to
///   `Ok(ScanStatus::NotFound)` rather than an error, so callers can
///   distinguish a lost scan from a failing service.
/// - Implementations should never panic; all failures are `ScanError`.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use scanledger::core::{ListName, ScanApi, ScanError, ScanStatus, ScanType};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyApi;
///
/// #[async_trait]
/// impl ScanApi for MyApi {
///     fn name(&self) -> &str {
///         "my-service"
///     }
///
///     async fn submit(
///         &self,
///         list: &ListName,
///         domains: &[String],
///         scan_type: ScanType,
///     ) -> Result<String, ScanError> {
///         // POST the batch, return the assigned id...
///         todo!()
///     }
///
///     async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError> {
///         // GET the status, fetch results when done...
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait ScanApi: Send + Sync + Debug {
    /// Returns a stable, human-readable name for this backend.
    fn name(&self) -> &str;

    /// Submits a batch scan of the given domains.
    ///
    /// # Returns
    ///
    /// The scan id the service assigned to this submission. The id is
    /// opaque; the only guarantee is that `poll` accepts it.
    ///
    /// # Errors
    ///
    /// Any `ScanError` other than `ScanIdNotFound` (which cannot apply
    /// to a submission): `Transport`, `Api`, `InvalidResponse`.
    async fn submit(
        &self,
        list: &ListName,
        domains: &[String],
        scan_type: ScanType,
    ) -> Result<String, ScanError>;

    /// Queries the current state of a previously submitted scan.
    ///
    /// # Returns
    ///
    /// * `Ok(ScanStatus::InProgress)` - Not finished yet.
    /// * `Ok(ScanStatus::Completed(report))` - Finished; `report` holds
    ///   the fetched result document.
    /// * `Ok(ScanStatus::NotFound)` - The service does not know the id.
    ///
    /// # Errors
    ///
    /// `Transport`, `Api` and `InvalidResponse` for failures that say
    /// nothing about the scan itself.
    async fn poll(&self, scan_id: &str) -> Result<ScanStatus, ScanError>;
}

/// A source of named domain lists.
///
/// A run is driven off one source: it names the lists that exist and
/// supplies the domains each list contains for a given scan profile.
/// Sources are loaded fully before a run starts, so the methods are
/// synchronous and infallible lookups except where the source genuinely
/// lacks data.
pub trait DomainSource: Send + Sync + Debug {
    /// Returns every list name in the source, sorted and deduplicated.
    fn list_names(&self) -> Vec<ListName>;

    /// Returns the ordered, deduplicated domains of one list for the
    /// given profile.
    ///
    /// # Errors
    ///
    /// * `SourceError::UnknownList` - No such list in this source.
    /// * `SourceError::NoDomains` - The list defines no domains for the
    ///   requested profile.
    fn domains(&self, list: &ListName, scan_type: ScanType) -> Result<Vec<String>, SourceError>;
}

/// An arc-wrapped scan API for shared ownership across sessions.
pub type ArcScanApi = std::sync::Arc<dyn ScanApi>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TwoListSource;

    impl DomainSource for TwoListSource {
        fn list_names(&self) -> Vec<ListName> {
            vec![ListName::new("alpha"), ListName::new("beta")]
        }

        fn domains(
            &self,
            list: &ListName,
            scan_type: ScanType,
        ) -> Result<Vec<String>, SourceError> {
            if list.as_str() == "ALPHA" {
                Ok(vec![format!("{}.example.nl", scan_type)])
            } else {
                Err(SourceError::UnknownList { list: list.clone() })
            }
        }
    }

    #[test]
    fn test_domain_source_object_safety() {
        let source: Box<dyn DomainSource> = Box::new(TwoListSource);
        assert_eq!(source.list_names().len(), 2);

        let domains = source
            .domains(&ListName::new("Alpha"), ScanType::Web)
            .unwrap();
        assert_eq!(domains, vec!["web.example.nl".to_string()]);
    }

    #[test]
    fn test_scan_status_terminal() {
        assert!(!ScanStatus::InProgress.is_terminal());
        assert!(ScanStatus::NotFound.is_terminal());
        assert!(ScanStatus::Completed(ScanReport::new(serde_json::json!({}))).is_terminal());
    }
}
