//! List record types.

use crate::core::ListName;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted metadata of one list's scan.
///
/// A record is written with `completed = false` the moment a submission
/// is accepted, before any waiting starts. A process that dies mid-poll
/// therefore leaves behind everything needed to resume: the list name
/// and the scan id the service assigned. The flag flips to `true` only
/// after the corresponding result payload has been durably saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    /// The list this record belongs to.
    pub list_name: ListName,

    /// The scan id the service assigned to the submission.
    pub scan_id: String,

    /// Whether the list's result has been durably saved.
    pub completed: bool,

    /// When the submission was recorded.
    pub submitted_at: DateTime<Utc>,

    /// When the result was saved, once `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ListRecord {
    /// Creates the record of a just-accepted submission.
    pub fn new(list_name: ListName, scan_id: impl Into<String>) -> Self {
        Self {
            list_name,
            scan_id: scan_id.into(),
            completed: false,
            submitted_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Marks the record as completed now.
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }
}
