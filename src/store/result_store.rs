//! Filesystem-based result storage.

use crate::core::error::StoreError;
use crate::core::{ListName, ListResult, ScanType};
use crate::store::record::ListRecord;

use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Filesystem-based storage of list records and list results.
///
/// One store spans exactly one scan-type namespace, so web and mail
/// runs over the same root never collide. Records and results are one
/// pretty-printed JSON file per list, named after the normalized list
/// name, which keeps the ledger inspectable with nothing but `cat`.
///
/// # Directory Structure
///
/// ```text
/// results/
/// ├── web/
/// │   ├── meta/
/// │   │   └── {LIST}.json      # ListRecord
/// │   └── results/
/// │       └── {LIST}.json      # ListResult
/// └── mail/
///     └── ...
/// ```
///
/// All writes go through a temporary file, an fsync and a rename, so a
/// record is either fully the old version or fully the new one. The
/// completed flag is flipped only after the result payload has been
/// renamed into place.
#[derive(Debug)]
pub struct ResultStore {
    /// Namespace directory for this store's scan type.
    base_path: PathBuf,
    /// The scan type this store is namespaced to.
    scan_type: ScanType,
}

impl ResultStore {
    /// Opens (creating if absent) the store for one scan type under the
    /// given root.
    ///
    /// Fails with `StoreError::InvalidLocation` if the root exists and
    /// is not a directory.
    pub fn open(root: impl Into<PathBuf>, scan_type: ScanType) -> Result<Self, StoreError> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(StoreError::InvalidLocation { path: root });
        }

        let base_path = root.join(scan_type.as_str());
        fs::create_dir_all(base_path.join("meta"))?;
        fs::create_dir_all(base_path.join("results"))?;

        Ok(Self {
            base_path,
            scan_type,
        })
    }

    /// Returns the scan type this store is namespaced to.
    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    fn meta_path(&self, list: &ListName) -> PathBuf {
        self.base_path
            .join("meta")
            .join(format!("{}.json", list.as_str()))
    }

    fn result_path(&self, list: &ListName) -> PathBuf {
        self.base_path
            .join("results")
            .join(format!("{}.json", list.as_str()))
    }

    /// Returns the stored record for a list, or `None` if the list has
    /// never been submitted in this namespace.
    pub fn list_record(&self, list: &ListName) -> Result<Option<ListRecord>, StoreError> {
        let path = self.meta_path(list);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let record =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed { path, source })?;
        Ok(Some(record))
    }

    /// Records that a scan has been submitted for a list.
    ///
    /// The record is durable when this returns: waiting on the scan may
    /// only start after the id that would be needed to resume it has
    /// reached disk.
    pub fn record_submission(&self, list: &ListName, scan_id: &str) -> Result<(), StoreError> {
        let record = ListRecord::new(list.clone(), scan_id);
        self.write_json(&self.meta_path(list), &record)?;

        tracing::debug!(list = %list, scan_id = %scan_id, "Submission recorded");
        Ok(())
    }

    /// Durably saves the result of a completed scan and marks the
    /// list's record as completed.
    ///
    /// The payload is written before the flag flips; a crash between
    /// the two writes leaves a resumable record, never a completed flag
    /// without data behind it.
    pub fn save_result(&self, result: &ListResult) -> Result<(), StoreError> {
        self.write_json(&self.result_path(&result.list_name), result)?;

        let mut record = match self.list_record(&result.list_name)? {
            Some(record) => record,
            None => ListRecord::new(result.list_name.clone(), &result.scan_id),
        };
        record.scan_id = result.scan_id.clone();
        record.mark_completed();
        self.write_json(&self.meta_path(&result.list_name), &record)?;

        tracing::debug!(
            list = %result.list_name,
            scan_id = %result.scan_id,
            domains = result.domain_count(),
            "List result saved"
        );
        Ok(())
    }

    /// Returns `true` iff a saved result exists for the list.
    pub fn is_result_available(&self, list: &ListName) -> bool {
        self.result_path(list).is_file()
    }

    /// Loads the saved result of a list.
    pub fn load_result(&self, list: &ListName) -> Result<ListResult, StoreError> {
        let path = self.result_path(list);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ResultMissing { list: list.clone() })
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Malformed { path, source })
    }

    /// Writes a value as pretty JSON via tmp file, fsync and rename.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        let tmp = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScanReport;
    use serde_json::json;
    use tempfile::TempDir;

    fn make_result(list: &str, scan_id: &str, payload: serde_json::Value) -> ListResult {
        ListResult::new(
            ListName::new(list),
            ScanType::Web,
            scan_id,
            vec!["www.a.example.nl".into()],
            ScanReport::new(payload),
        )
    }

    #[test]
    fn test_submission_then_completion_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let list = ListName::new("banks");

        assert!(store.list_record(&list).unwrap().is_none());
        assert!(!store.is_result_available(&list));

        store.record_submission(&list, "req-1").unwrap();
        let record = store.list_record(&list).unwrap().unwrap();
        assert_eq!(record.scan_id, "req-1");
        assert!(!record.completed);
        assert!(!store.is_result_available(&list));

        let result = make_result("banks", "req-1", json!({"score": 80}));
        store.save_result(&result).unwrap();

        let record = store.list_record(&list).unwrap().unwrap();
        assert!(record.completed);
        assert!(record.completed_at.is_some());
        assert!(store.is_result_available(&list));
        assert_eq!(store.load_result(&list).unwrap(), result);
    }

    #[test]
    fn test_reopened_store_sees_pending_submission() {
        let temp_dir = TempDir::new().unwrap();
        let list = ListName::new("museums");

        {
            let store = ResultStore::open(temp_dir.path(), ScanType::Mail).unwrap();
            store.record_submission(&list, "req-9").unwrap();
            // Process dies here, before any result arrives
        }

        let store = ResultStore::open(temp_dir.path(), ScanType::Mail).unwrap();
        let record = store.list_record(&list).unwrap().unwrap();
        assert_eq!(record.scan_id, "req-9");
        assert!(!record.completed);
    }

    #[test]
    fn test_scan_type_namespaces_are_separate() {
        let temp_dir = TempDir::new().unwrap();
        let list = ListName::new("banks");

        let web = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let mail = ResultStore::open(temp_dir.path(), ScanType::Mail).unwrap();

        web.record_submission(&list, "req-web").unwrap();
        assert!(web.list_record(&list).unwrap().is_some());
        assert!(mail.list_record(&list).unwrap().is_none());
    }

    #[test]
    fn test_missing_result_is_distinct_from_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let list = ListName::new("banks");

        let err = store.load_result(&list).unwrap_err();
        assert!(matches!(err, StoreError::ResultMissing { .. }));

        fs::write(store.result_path(&list), "{ not json").unwrap();
        let err = store.load_result(&list).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_malformed_record_is_an_error_not_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let list = ListName::new("banks");

        fs::write(store.meta_path(&list), "{ not json").unwrap();
        let err = store.list_record(&list).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn test_traversal_style_list_name_stays_inside_namespace() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let list = ListName::new("../escape");

        store.record_submission(&list, "req-1").unwrap();

        let meta_dir = temp_dir.path().join("web").join("meta");
        assert!(store.meta_path(&list).starts_with(&meta_dir));
        assert!(meta_dir.join(".._ESCAPE.json").is_file());
        assert!(!temp_dir.path().join("web").join("ESCAPE.json").exists());
        assert_eq!(
            store.list_record(&list).unwrap().unwrap().scan_id,
            "req-1"
        );
    }

    #[test]
    fn test_open_rejects_non_directory_root() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not-a-dir");
        fs::write(&file_path, "plain file").unwrap();

        let err = ResultStore::open(&file_path, ScanType::Web).unwrap_err();
        assert!(matches!(err, StoreError::InvalidLocation { .. }));
    }

    #[test]
    fn test_save_result_replaces_previous_result() {
        let temp_dir = TempDir::new().unwrap();
        let store = ResultStore::open(temp_dir.path(), ScanType::Web).unwrap();
        let list = ListName::new("banks");

        store.save_result(&make_result("banks", "req-1", json!({"run": 1}))).unwrap();
        store.save_result(&make_result("banks", "req-2", json!({"run": 2}))).unwrap();

        let loaded = store.load_result(&list).unwrap();
        assert_eq!(loaded.scan_id, "req-2");
        assert_eq!(loaded.report.as_value()["run"], 2);

        let record = store.list_record(&list).unwrap().unwrap();
        assert_eq!(record.scan_id, "req-2");
        assert!(record.completed);
    }
}
