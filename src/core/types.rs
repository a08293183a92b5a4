//! Core types used throughout the scanledger library.
//!
//! This module defines the fundamental data structures for identifying
//! scan profiles and named domain lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::InvalidScanType;

/// The scan profile submitted to the remote scanning service.
///
/// The service runs a different battery of checks depending on whether a
/// domain is tested as a website or as a mail domain, and results for the
/// two profiles are stored in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// Website security scan (HTTPS, headers, DNSSEC and related checks).
    Web,

    /// Mail domain security scan (SPF, DKIM, DMARC, STARTTLS and related checks).
    Mail,
}

impl ScanType {
    /// Returns the lowercase wire name of the profile, as the remote
    /// service expects it in submissions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mail => "mail",
        }
    }
}

impl FromStr for ScanType {
    type Err = InvalidScanType;

    /// Parses a profile name case-insensitively (`"web"`, `"MAIL"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("web") {
            Ok(Self::Web)
        } else if s.eq_ignore_ascii_case("mail") {
            Ok(Self::Mail)
        } else {
            Err(InvalidScanType(s.to_string()))
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The normalized name of a domain list.
///
/// List names come from the domain source (one list per named group of
/// domains) and double as storage keys: a list's metadata and result files
/// are named after it. Names are normalized on construction (trimmed,
/// upper-cased, path separators replaced) so that lookups, stored files
/// and user input agree on a single spelling and a name can never escape
/// the store's directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListName(String);

impl ListName {
    /// Creates a normalized list name.
    pub fn new(name: impl Into<String>) -> Self {
        // Separators would let a name address files outside the store
        Self(name.into().trim().to_uppercase().replace(['/', '\\'], "_"))
    }

    /// Returns the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ListName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for ListName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_type_parses_case_insensitively() {
        assert_eq!("web".parse::<ScanType>().unwrap(), ScanType::Web);
        assert_eq!("WEB".parse::<ScanType>().unwrap(), ScanType::Web);
        assert_eq!("Mail".parse::<ScanType>().unwrap(), ScanType::Mail);
        assert_eq!("MAIL".parse::<ScanType>().unwrap(), ScanType::Mail);
    }

    #[test]
    fn test_scan_type_rejects_unknown_profiles() {
        let err = "imap".parse::<ScanType>().unwrap_err();
        assert!(err.to_string().contains("imap"));
    }

    #[test]
    fn test_scan_type_wire_names() {
        assert_eq!(ScanType::Web.as_str(), "web");
        assert_eq!(ScanType::Mail.as_str(), "mail");
        assert_eq!(format!("{}", ScanType::Mail), "mail");
    }

    #[test]
    fn test_list_name_normalization() {
        assert_eq!(ListName::new("  municipalities ").as_str(), "MUNICIPALITIES");
        assert_eq!(ListName::new("Banks"), ListName::new("BANKS"));
        assert_eq!(ListName::from("banks").as_str(), "BANKS");
    }

    #[test]
    fn test_list_name_neutralizes_path_separators() {
        assert_eq!(ListName::new("../evil").as_str(), ".._EVIL");
        assert_eq!(ListName::new("a/b\\c").as_str(), "A_B_C");
        assert_eq!(ListName::new("..").as_str(), "..");
    }

    #[test]
    fn test_list_name_orders_lexicographically() {
        let mut names = vec![
            ListName::new("zeta"),
            ListName::new("alpha"),
            ListName::new("mid"),
        ];
        names.sort();
        let ordered: Vec<&str> = names.iter().map(ListName::as_str).collect();
        assert_eq!(ordered, vec!["ALPHA", "MID", "ZETA"]);
    }
}
