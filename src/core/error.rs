//! Error types for the scanledger library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values.
//! Run-level errors carry the list name, scan type and phase that failed,
//! so a batch abort is diagnosable from the error alone.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::types::{ListName, ScanType};

/// A scan type string that matched no known profile.
#[derive(Debug, Error)]
#[error("unknown scan type '{0}': expected 'web' or 'mail'")]
pub struct InvalidScanType(pub String);

/// Error type for remote scan API interaction.
///
/// `ScanIdNotFound` is the one variant with recovery semantics: the
/// service no longer knows a previously issued scan id, so the only way
/// forward is submitting a replacement scan. Every other variant is a
/// remote-service failure that aborts the current run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The service no longer knows the given scan id.
    #[error("scan '{scan_id}' is no longer known to the scanning service")]
    ScanIdNotFound {
        /// The scan id the service did not recognize.
        scan_id: String,
    },

    /// The request never produced a usable HTTP response.
    #[error("request to the scanning service failed: {message}")]
    Transport {
        /// Error message describing the failure.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("scanning service returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The service answered with a body this client cannot interpret.
    #[error("could not interpret response from the scanning service: {details}")]
    InvalidResponse {
        /// Details about what was unexpected.
        details: String,
    },

    /// The scan did not reach a terminal state within the configured wait.
    #[error("scan '{scan_id}' did not finish within {waited:?}")]
    Timeout {
        /// The scan id that was being waited on.
        scan_id: String,
        /// How long the session polled before giving up.
        waited: Duration,
    },
}

impl ScanError {
    /// Returns `true` if the service reported the scan id as unknown,
    /// which makes resubmission the appropriate recovery.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ScanIdNotFound { .. })
    }

    /// Creates a `ScanIdNotFound` error.
    pub fn scan_id_not_found(scan_id: impl Into<String>) -> Self {
        Self::ScanIdNotFound {
            scan_id: scan_id.into(),
        }
    }

    /// Creates a `Transport` error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an `InvalidResponse` error.
    pub fn invalid_response(details: impl Into<String>) -> Self {
        Self::InvalidResponse {
            details: details.into(),
        }
    }
}

/// Error type for result store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store root exists but is not a usable directory.
    #[error("invalid result store location: {path}")]
    InvalidLocation {
        /// The offending path.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record exists but could not be parsed.
    #[error("malformed record at {path}: {source}")]
    Malformed {
        /// Path of the unreadable record.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for writing.
    #[error("failed to encode record for {path}: {source}")]
    Encode {
        /// Path the record was being written to.
        path: PathBuf,
        /// The underlying encoding error.
        #[source]
        source: serde_json::Error,
    },

    /// No stored result exists for the requested list.
    #[error("no stored result for list '{list}'")]
    ResultMissing {
        /// The list whose result was requested.
        list: ListName,
    },
}

/// Error type for domain source operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The domains file could not be read.
    #[error("failed to read domains file {path}: {source}")]
    Read {
        /// Path of the domains file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The domains file is not valid JSON of the expected shape.
    #[error("malformed domains file {path}: {source}")]
    Malformed {
        /// Path of the domains file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The domains file defines no lists at all.
    #[error("no lists defined in domains file {path}")]
    NoLists {
        /// Path of the domains file.
        path: PathBuf,
    },

    /// Two list entries collide after name normalization.
    #[error("duplicate list name '{list}' after normalization")]
    DuplicateList {
        /// The colliding normalized name.
        list: ListName,
    },

    /// The requested list is not present in the source.
    #[error("list '{list}' is not present in the domain source")]
    UnknownList {
        /// The unknown list name.
        list: ListName,
    },

    /// The list exists but defines no domains for the requested profile.
    #[error("list '{list}' has no {scan_type} domains")]
    NoDomains {
        /// The list missing domains.
        list: ListName,
        /// The profile that was requested.
        scan_type: ScanType,
    },
}

/// The phase of a list's lifecycle in which a remote failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// Submitting a new scan for the list.
    Submit,

    /// Polling a submitted scan for completion.
    Poll,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submission"),
            Self::Poll => write!(f, "polling"),
        }
    }
}

/// The error type returned by orchestrator construction and runs.
///
/// Failures that happen while a specific list is being processed carry
/// the list name, scan type and phase alongside the underlying error.
#[derive(Debug, Error)]
pub enum RunError {
    /// The orchestrator was misconfigured.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// A requested list does not exist in the domain source.
    #[error("unknown list '{list}': not present in the domain source")]
    UnknownList {
        /// The unknown list name.
        list: ListName,
    },

    /// Neither the request nor the source yielded any list to process.
    #[error("no lists to process")]
    EmptySource,

    /// The domain source failed while supplying lists or domains.
    #[error("domain source error: {0}")]
    Source(#[from] SourceError),

    /// Remote interaction failed for a specific list.
    #[error("{phase} failed for {scan_type} list '{list}': {source}")]
    Scan {
        /// The list being processed.
        list: ListName,
        /// The scan profile of the run.
        scan_type: ScanType,
        /// The phase that failed.
        phase: ScanPhase,
        /// The underlying remote error.
        #[source]
        source: ScanError,
    },

    /// Persistence failed for a specific list.
    #[error("storage failed for {scan_type} list '{list}': {source}")]
    Store {
        /// The list being processed.
        list: ListName,
        /// The scan profile of the run.
        scan_type: ScanType,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },
}

impl RunError {
    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a `Scan` error carrying list context.
    pub fn scan(list: ListName, scan_type: ScanType, phase: ScanPhase, source: ScanError) -> Self {
        Self::Scan {
            list,
            scan_type,
            phase,
            source,
        }
    }

    /// Creates a `Store` error carrying list context.
    pub fn store(list: ListName, scan_type: ScanType, source: StoreError) -> Self {
        Self::Store {
            list,
            scan_type,
            source,
        }
    }
}

/// A specialized `Result` type for orchestrator runs.
pub type RunResult<T> = Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_is_not_found() {
        let lost = ScanError::scan_id_not_found("abc-123");
        assert!(lost.is_not_found());

        let transport = ScanError::transport("connection refused");
        assert!(!transport.is_not_found());
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::Api {
            status: 429,
            message: "too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn test_run_error_carries_list_context() {
        let err = RunError::scan(
            ListName::new("banks"),
            ScanType::Mail,
            ScanPhase::Poll,
            ScanError::transport("reset by peer"),
        );
        let text = err.to_string();
        assert!(text.contains("polling"));
        assert!(text.contains("mail"));
        assert!(text.contains("BANKS"));
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::NoDomains {
            list: ListName::new("museums"),
            scan_type: ScanType::Web,
        };
        assert!(err.to_string().contains("MUSEUMS"));
        assert!(err.to_string().contains("web"));
    }
}
