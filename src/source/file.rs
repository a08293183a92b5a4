//! JSON-backed domain source.
//!
//! This module reads named domain lists from a JSON document of the
//! shape:
//!
//! ```json
//! {
//!   "lists": {
//!     "Municipalities": {
//!       "web": ["www.a.example.nl", "www.b.example.nl"],
//!       "mail": ["a.example.nl", "b.example.nl"]
//!     }
//!   }
//! }
//! ```
//!
//! A list may carry domains for one profile only; requesting the other
//! profile is an error rather than an empty submission. The whole file
//! is parsed up front, so runs never fail halfway through on source
//! reads.

use crate::core::{DomainSource, ListName, ScanType, SourceError};

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct RawDomainFile {
    #[serde(default)]
    lists: BTreeMap<String, RawList>,
}

#[derive(Debug, Default, Deserialize)]
struct RawList {
    #[serde(default)]
    web: Vec<String>,
    #[serde(default)]
    mail: Vec<String>,
}

#[derive(Debug, Clone)]
struct ListDomains {
    web: Vec<String>,
    mail: Vec<String>,
}

/// A domain source backed by a JSON file.
///
/// List names are normalized on load; two entries that collide after
/// normalization are rejected. Domains are lowercased and deduplicated
/// preserving first occurrence, so submission order is the file's order.
#[derive(Debug, Clone)]
pub struct DomainFile {
    lists: BTreeMap<ListName, ListDomains>,
}

impl DomainFile {
    /// Loads a domains file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parses a domains document held in memory.
    ///
    /// Useful in tests and for callers that fetch the document from
    /// somewhere other than the local filesystem.
    pub fn from_json_str(text: &str) -> Result<Self, SourceError> {
        Self::parse(text, Path::new("<memory>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, SourceError> {
        let raw: RawDomainFile =
            serde_json::from_str(text).map_err(|source| SourceError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        if raw.lists.is_empty() {
            return Err(SourceError::NoLists {
                path: path.to_path_buf(),
            });
        }

        let mut lists = BTreeMap::new();
        for (name, entry) in raw.lists {
            let list = ListName::new(name);
            let domains = ListDomains {
                web: normalize_domains(entry.web),
                mail: normalize_domains(entry.mail),
            };
            if lists.insert(list.clone(), domains).is_some() {
                return Err(SourceError::DuplicateList { list });
            }
        }

        Ok(Self { lists })
    }

    /// Returns the number of lists in this source.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns `true` if the source defines no lists.
    ///
    /// Loading rejects empty documents, so this is only reachable for
    /// sources assembled by other means.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Lowercases, trims and deduplicates domains, preserving first
/// occurrence order.
fn normalize_domains(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for domain in raw {
        let domain = domain.trim().to_lowercase();
        if !domain.is_empty() && seen.insert(domain.clone()) {
            out.push(domain);
        }
    }
    out
}

impl DomainSource for DomainFile {
    fn list_names(&self) -> Vec<ListName> {
        self.lists.keys().cloned().collect()
    }

    fn domains(&self, list: &ListName, scan_type: ScanType) -> Result<Vec<String>, SourceError> {
        let entry = self
            .lists
            .get(list)
            .ok_or_else(|| SourceError::UnknownList { list: list.clone() })?;

        let domains = match scan_type {
            ScanType::Web => &entry.web,
            ScanType::Mail => &entry.mail,
        };

        if domains.is_empty() {
            return Err(SourceError::NoDomains {
                list: list.clone(),
                scan_type,
            });
        }

        Ok(domains.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lists": {
            "zeta": {"web": ["z.example.nl"]},
            "Alpha": {"web": ["WWW.A.example.nl", "www.a.example.nl", "www.b.example.nl"]},
            "mid": {"mail": ["m.example.nl"], "web": ["www.m.example.nl"]}
        }
    }"#;

    #[test]
    fn test_list_names_are_normalized_and_sorted() {
        let source = DomainFile::from_json_str(SAMPLE).unwrap();
        let names: Vec<String> = source
            .list_names()
            .iter()
            .map(|n| n.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["ALPHA", "MID", "ZETA"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_domains_deduplicated_preserving_order() {
        let source = DomainFile::from_json_str(SAMPLE).unwrap();
        let domains = source
            .domains(&ListName::new("alpha"), ScanType::Web)
            .unwrap();
        assert_eq!(
            domains,
            vec!["www.a.example.nl".to_string(), "www.b.example.nl".to_string()]
        );
    }

    #[test]
    fn test_unknown_list_is_rejected() {
        let source = DomainFile::from_json_str(SAMPLE).unwrap();
        let err = source
            .domains(&ListName::new("nonexistent"), ScanType::Web)
            .unwrap_err();
        assert!(matches!(err, SourceError::UnknownList { .. }));
    }

    #[test]
    fn test_missing_profile_is_rejected() {
        let source = DomainFile::from_json_str(SAMPLE).unwrap();
        let err = source
            .domains(&ListName::new("zeta"), ScanType::Mail)
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::NoDomains {
                scan_type: ScanType::Mail,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_list_names_after_normalization() {
        let text = r#"{"lists": {"Banks": {"web": ["a.nl"]}, "BANKS": {"web": ["b.nl"]}}}"#;
        let err = DomainFile::from_json_str(text).unwrap_err();
        assert!(matches!(err, SourceError::DuplicateList { .. }));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = DomainFile::from_json_str(r#"{"lists": {}}"#).unwrap_err();
        assert!(matches!(err, SourceError::NoLists { .. }));

        let err = DomainFile::from_json_str("{}").unwrap_err();
        assert!(matches!(err, SourceError::NoLists { .. }));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let err = DomainFile::from_json_str("not json at all").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("domains.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = DomainFile::load(&path).unwrap();
        assert_eq!(source.len(), 3);

        let err = DomainFile::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }
}
